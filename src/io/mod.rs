pub mod config_io;
pub mod page_io;
