use std::fs;
use std::path::{Path, PathBuf};

use crate::model::dom::Dom;
use crate::parse::outline_parser::OutlineError;
use crate::parse::script_parser::{ScriptError, Step};
use crate::parse::{parse_outline, parse_script};

/// Error type for loading pages and scripts
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    OutlineError { path: PathBuf, source: OutlineError },
    #[error("{path}: {source}")]
    ScriptError { path: PathBuf, source: ScriptError },
    #[error("could not parse widget config: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize widget config: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),
}

fn read(path: &Path) -> Result<String, PageError> {
    fs::read_to_string(path).map_err(|e| PageError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a page outline from disk.
pub fn load_page(path: &Path) -> Result<Dom, PageError> {
    let text = read(path)?;
    parse_outline(&text).map_err(|e| PageError::OutlineError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load an event script from disk.
pub fn load_script(path: &Path) -> Result<Vec<Step>, PageError> {
    let text = read(path)?;
    parse_script(&text).map_err(|e| PageError::ScriptError {
        path: path.to_path_buf(),
        source: e,
    })
}
