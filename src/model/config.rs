use serde::{Deserialize, Serialize};

/// Widget wiring for a page, read from `widgets.toml`.
///
/// Every section defaults to the standard admin-form wiring, so an empty
/// file (or no file at all) attaches the stock widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_lists")]
    pub lists: Vec<ListConfig>,
    #[serde(default)]
    pub tombstone: TombstoneConfig,
    #[serde(default = "default_dropdowns")]
    pub dropdowns: Vec<DropdownConfig>,
    #[serde(default)]
    pub dirty: DirtyConfig,
    #[serde(default)]
    pub clamp: ClampConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            lists: default_lists(),
            tombstone: TombstoneConfig::default(),
            dropdowns: default_dropdowns(),
            dirty: DirtyConfig::default(),
            clamp: ClampConfig::default(),
        }
    }
}

/// How removing a row that was already on the page is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingRemoval {
    /// Detach the row; the server rebuilds the list from what is submitted
    Remove,
    /// Enable the row's pre-rendered disabled input and hide the row
    Retire,
    /// Hide the row and append a deletion tombstone
    Tombstone,
}

/// One repeatable field group: its template, container and controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    pub name: String,
    /// Element id of the hidden template
    pub template: String,
    /// Element id of the container instances are mounted into
    pub container: String,
    /// Element id of the control that mounts a new instance
    pub add_button: String,
    /// Element id of the trailing anchor; instances are appended when unset
    #[serde(default)]
    pub anchor: Option<String>,
    /// Class carried by the remove controls of server-rendered rows
    pub remove_class: String,
    pub existing: ExistingRemoval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TombstoneConfig {
    /// Element id of the hidden, disabled deletion tombstone template
    #[serde(default = "default_tombstone_template")]
    pub template: String,
    /// Field name used when a tombstone has to be synthesized at submission
    #[serde(default = "default_tombstone_name")]
    pub name: String,
}

impl Default for TombstoneConfig {
    fn default() -> Self {
        TombstoneConfig {
            template: default_tombstone_template(),
            name: default_tombstone_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownConfig {
    /// Element id of the trigger; the panel is `<trigger>-dropdown`
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyConfig {
    #[serde(default = "default_dirty_form")]
    pub form: String,
    #[serde(default = "default_dirty_submit")]
    pub submit: String,
    /// Tracked fields, matched by name and then by element id
    #[serde(default = "default_dirty_fields")]
    pub fields: Vec<String>,
}

impl Default for DirtyConfig {
    fn default() -> Self {
        DirtyConfig {
            form: default_dirty_form(),
            submit: default_dirty_submit(),
            fields: default_dirty_fields(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampConfig {
    #[serde(default = "default_clamp_class")]
    pub class: String,
    #[serde(default = "default_clamp_expanded")]
    pub expanded_class: String,
}

impl Default for ClampConfig {
    fn default() -> Self {
        ClampConfig {
            class: default_clamp_class(),
            expanded_class: default_clamp_expanded(),
        }
    }
}

fn default_lists() -> Vec<ListConfig> {
    vec![
        ListConfig {
            name: "multi-option".into(),
            template: "multi-option-question-answer-template".into(),
            container: "question-settings".into(),
            add_button: "add-new-option".into(),
            anchor: Some("add-new-option".into()),
            remove_class: "multi-option-question-field-remove-button".into(),
            existing: ExistingRemoval::Remove,
        },
        ListConfig {
            name: "program-admin".into(),
            template: "program-admin-email-template".into(),
            container: "program-admin-emails".into(),
            add_button: "add-program-admin-button".into(),
            anchor: Some("add-program-admin-button".into()),
            remove_class: "cf-program-admin-remove-button".into(),
            existing: ExistingRemoval::Retire,
        },
        ListConfig {
            name: "enumerator".into(),
            template: "enumerator-field-template".into(),
            container: "enumerator-fields".into(),
            add_button: "enumerator-field-add-button".into(),
            anchor: None,
            remove_class: "cf-enumerator-delete-button".into(),
            existing: ExistingRemoval::Tombstone,
        },
    ]
}

fn default_dropdowns() -> Vec<DropdownConfig> {
    vec![DropdownConfig {
        trigger: "create-question-button".into(),
    }]
}

fn default_tombstone_template() -> String {
    "enumerator-delete-template".into()
}

fn default_tombstone_name() -> String {
    "delete[]".into()
}

fn default_dirty_form() -> String {
    "block-edit-form".into()
}

fn default_dirty_submit() -> String {
    "update-block-button".into()
}

fn default_dirty_fields() -> Vec<String> {
    vec![
        "block-name-input".into(),
        "block-description-textarea".into(),
    ]
}

fn default_clamp_class() -> String {
    "cf-application-card-description".into()
}

fn default_clamp_expanded() -> String {
    "line-clamp-none".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: WidgetConfig = toml::from_str("").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.lists.len(), 3);
        assert_eq!(config.lists[2].existing, ExistingRemoval::Tombstone);
        assert_eq!(config.lists[2].anchor, None);
    }

    #[test]
    fn test_lists_override_replaces_defaults() {
        let config: WidgetConfig = toml::from_str(
            r#"
[[lists]]
name = "tags"
template = "tag-template"
container = "tags"
add_button = "add-tag"
anchor = "add-tag"
remove_class = "tag-remove"
existing = "tombstone"

[dirty]
fields = ["title"]
"#,
        )
        .unwrap();
        assert_eq!(config.lists.len(), 1);
        assert_eq!(config.lists[0].name, "tags");
        assert_eq!(config.dirty.fields, vec!["title".to_string()]);
        assert_eq!(config.dirty.form, "block-edit-form");
        assert_eq!(config.dropdowns, default_dropdowns());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string(&WidgetConfig::default()).unwrap();
        let parsed: WidgetConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, WidgetConfig::default());
    }
}
