pub mod outline_parser;
pub mod outline_serializer;
pub mod script_parser;

pub use outline_parser::parse_outline;
pub use outline_serializer::{serialize_outline, serialize_subtree};
pub use script_parser::{Selector, Step, parse_script};
