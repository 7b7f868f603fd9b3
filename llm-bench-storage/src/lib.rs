pub mod dataset;
pub mod artifacts;

pub use dataset::*;
pub use artifacts::*;
