pub mod judges;
pub mod pipeline;
pub mod prompt;
pub mod runner;
pub mod sampler;

pub use judges::*;
pub use pipeline::*;
pub use prompt::*;
pub use runner::*;
pub use sampler::*;
