//! Boundary between the view controller and the map engine.
//!
//! The controller only ever talks to the engine through [`MapAdapter`];
//! [`RecordingMap`] is an in-memory engine used by tests and headless hosts.

pub mod adapter;
pub mod drawable;
pub mod layer;
pub mod recording;
pub mod viewport;

pub use adapter::*;
pub use drawable::*;
pub use layer::*;
pub use recording::*;
pub use viewport::*;
