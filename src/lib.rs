pub mod cli;
pub mod events;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
