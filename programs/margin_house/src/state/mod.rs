//! Account state for the margin house

pub mod config;
pub mod engine;
pub mod margin;
pub mod pool;
pub mod position;

pub use config::*;
pub use engine::*;
pub use margin::*;
pub use pool::*;
pub use position::*;
