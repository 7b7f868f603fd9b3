pub mod evaluators;
pub mod statistical;

pub use evaluators::*;
pub use statistical::*;
