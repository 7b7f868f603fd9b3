pub mod ids;
pub mod task;
pub mod table;
pub mod metadata;
pub mod report;

pub use ids::*;
pub use task::*;
pub use table::*;
pub use metadata::*;
pub use report::*;
