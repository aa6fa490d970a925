//! Interaction: the ray probe and the stations it targets.
pub mod probe;
pub mod station;

pub use probe::*;
pub use station::*;
