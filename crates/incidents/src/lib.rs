//! Incident and fire-department records as exchanged with the incident API.

pub mod mock;
pub mod record;

pub use record::*;
