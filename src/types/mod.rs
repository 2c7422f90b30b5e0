pub mod market;
pub mod sentiment;
pub mod signals;

pub use market::*;
pub use sentiment::*;
pub use signals::*;
