pub mod client;
pub mod gateway;
pub mod prompts;
pub mod validation;

pub use client::*;
pub use gateway::*;
pub use prompts::*;
pub use validation::*;
