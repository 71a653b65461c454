pub mod cache;
pub mod logger;

pub use cache::*;
pub use logger::*;
