pub mod color;
pub mod config;
pub mod env;
pub mod render;
pub mod segments;
pub mod template;
pub mod utils;

pub use color::*;
pub use config::*;
pub use env::*;
pub use render::*;
pub use segments::*;
pub use template::*;
pub use utils::*;
