pub mod geo;
pub mod ids;
pub mod time;

// Coordinates, time and record ids shared by every other crate.
pub use geo::*;
pub use ids::*;
pub use time::*;
