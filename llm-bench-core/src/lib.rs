pub mod domain;
pub mod error;
pub mod letters;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use traits::*;
