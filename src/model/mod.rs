pub mod config;
pub mod dom;
pub mod entity;
pub mod page;

pub use config::*;
pub use dom::*;
pub use entity::*;
pub use page::*;
