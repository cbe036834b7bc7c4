pub mod params;
pub mod schedule;

pub use params::*;
pub use schedule::*;
