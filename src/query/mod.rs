pub mod context;
pub mod error;
pub mod orchestrator;

pub use context::*;
pub use error::*;
pub use orchestrator::*;
