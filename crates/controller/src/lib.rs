//! Map viewport/layer controller.
//!
//! Owns the debounce slot, the display mode and the attached marker groups
//! for one map instance. Hosts feed it viewport events and data sets and
//! advance it with [`MapController::pump`].

pub mod config;
pub mod controller;

pub use config::*;
pub use controller::*;
