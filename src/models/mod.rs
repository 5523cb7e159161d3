pub mod profile;
pub mod query;
pub mod week;

pub use profile::*;
pub use query::*;
pub use week::*;
