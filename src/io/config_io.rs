use std::fs;
use std::path::Path;

use tracing::debug;

use crate::io::page_io::PageError;
use crate::model::config::WidgetConfig;

/// Conventional config file name, looked up next to the page
pub const CONFIG_FILE: &str = "widgets.toml";

/// Read the widget config.
///
/// An explicit path must exist. Without one, `widgets.toml` in the page's
/// directory is used when present, and the stock wiring otherwise.
pub fn read_config(explicit: Option<&Path>, page: &Path) -> Result<WidgetConfig, PageError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = page
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE);
            if !candidate.is_file() {
                debug!("no widgets.toml next to page; using default wiring");
                return Ok(WidgetConfig::default());
            }
            candidate
        }
    };
    let text = fs::read_to_string(&path).map_err(|e| PageError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: WidgetConfig = toml::from_str(&text)?;
    debug!(path = %path.display(), lists = config.lists.len(), "loaded widget config");
    Ok(config)
}

/// The stock wiring as TOML, for `fw config`.
pub fn default_config_toml() -> Result<String, PageError> {
    Ok(toml::to_string_pretty(&WidgetConfig::default())?)
}
