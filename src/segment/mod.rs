pub mod messages;
pub mod weeks;

pub use messages::*;
pub use weeks::*;
