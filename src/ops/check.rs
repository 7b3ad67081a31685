use serde::Serialize;

use crate::model::config::{ExistingRemoval, WidgetConfig};
use crate::model::dom::{Dom, NodeId};
use crate::ops::toggle::panel_id;

/// Structured result from `fw check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// Markup that breaks a widget which is otherwise present on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A template has no interior `type=button` remove control
    #[serde(rename = "template_without_remove_control")]
    TemplateWithoutRemoveControl { list: String, template: String },
    /// A template has more than one remove control; only the first is wired
    #[serde(rename = "template_with_extra_remove_controls")]
    TemplateWithExtraRemoveControls {
        list: String,
        template: String,
        count: usize,
    },
    /// The configured anchor exists but is not a child of the container
    #[serde(rename = "anchor_outside_container")]
    AnchorOutsideContainer { list: String, anchor: String },
    /// The anchor is not the container's last child
    #[serde(rename = "anchor_not_last")]
    AnchorNotLast { list: String, anchor: String },
    /// A tombstone list has server rows but no tombstone template
    #[serde(rename = "missing_tombstone_template")]
    MissingTombstoneTemplate { list: String, template: String },
    /// A tombstone-mode remove control carries no identity
    #[serde(rename = "remove_control_without_identity")]
    RemoveControlWithoutIdentity { list: String },
    /// A tracked dirty-check field is absent from the form
    #[serde(rename = "missing_tracked_field")]
    MissingTrackedField { form: String, field: String },
    /// A dropdown trigger has no matching panel
    #[serde(rename = "missing_dropdown_panel")]
    MissingDropdownPanel { trigger: String, panel: String },
}

/// Widget markup that is absent or unusual; expected on pages that omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// None of the list's container, template or add control is present
    #[serde(rename = "list_absent")]
    ListAbsent { list: String },
    /// Some but not all of a list's nodes are present
    #[serde(rename = "list_incomplete")]
    ListIncomplete { list: String, missing: Vec<String> },
    /// A template is not marked hidden
    #[serde(rename = "template_visible")]
    TemplateVisible { template: String },
    /// The tombstone template is enabled, so it would submit on its own
    #[serde(rename = "tombstone_template_enabled")]
    TombstoneTemplateEnabled { template: String },
    #[serde(rename = "dirty_form_absent")]
    DirtyFormAbsent { form: String },
    #[serde(rename = "dropdown_absent")]
    DropdownAbsent { trigger: String },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a page's markup against the widget configuration.
///
/// Read-only. Errors are markup that would make an attached widget silently
/// misbehave; warnings are widgets that would simply not attach.
pub fn check_page(dom: &Dom, config: &WidgetConfig) -> CheckResult {
    let mut result = CheckResult::default();

    for list in &config.lists {
        let container = dom.get_element_by_id(&list.container);
        let template = dom.get_element_by_id(&list.template);
        let add = dom.get_element_by_id(&list.add_button);

        let mut missing = Vec::new();
        if container.is_none() {
            missing.push(list.container.clone());
        }
        if template.is_none() {
            missing.push(list.template.clone());
        }
        if add.is_none() {
            missing.push(list.add_button.clone());
        }
        if missing.len() == 3 {
            result.warnings.push(CheckWarning::ListAbsent {
                list: list.name.clone(),
            });
            continue;
        }
        if !missing.is_empty() {
            result.warnings.push(CheckWarning::ListIncomplete {
                list: list.name.clone(),
                missing,
            });
        }

        if let Some(template) = template {
            check_template(dom, template, &list.name, &list.template, &mut result);
        }

        if let (Some(container), Some(anchor_id)) = (container, list.anchor.as_deref())
            && let Some(anchor) = dom.get_element_by_id(anchor_id)
        {
            if dom.parent(anchor) != Some(container) {
                result.errors.push(CheckError::AnchorOutsideContainer {
                    list: list.name.clone(),
                    anchor: anchor_id.to_string(),
                });
            } else if dom.children(container).last() != Some(&anchor) {
                result.errors.push(CheckError::AnchorNotLast {
                    list: list.name.clone(),
                    anchor: anchor_id.to_string(),
                });
            }
        }

        if list.existing == ExistingRemoval::Tombstone {
            let controls: Vec<NodeId> = dom
                .elements_with_class(&list.remove_class)
                .into_iter()
                .filter(|&c| template.is_none_or(|t| !dom.contains(t, c)))
                .collect();
            if controls
                .iter()
                .any(|&c| dom.node(c).id.as_deref().is_none_or(str::is_empty))
            {
                result.errors.push(CheckError::RemoveControlWithoutIdentity {
                    list: list.name.clone(),
                });
            }
            if !controls.is_empty() {
                check_tombstone_template(dom, config, &list.name, &mut result);
            }
        }
    }

    check_dirty(dom, config, &mut result);

    for dropdown in &config.dropdowns {
        if dom.get_element_by_id(&dropdown.trigger).is_none() {
            result.warnings.push(CheckWarning::DropdownAbsent {
                trigger: dropdown.trigger.clone(),
            });
            continue;
        }
        let panel = panel_id(&dropdown.trigger);
        if dom.get_element_by_id(&panel).is_none() {
            result.errors.push(CheckError::MissingDropdownPanel {
                trigger: dropdown.trigger.clone(),
                panel,
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_template(dom: &Dom, template: NodeId, list: &str, id: &str, result: &mut CheckResult) {
    if !dom.node(template).is_hidden() {
        result.warnings.push(CheckWarning::TemplateVisible {
            template: id.to_string(),
        });
    }
    let count = dom
        .descendants(template)
        .into_iter()
        .filter(|&d| dom.node(d).is_remove_control())
        .count();
    match count {
        0 => result.errors.push(CheckError::TemplateWithoutRemoveControl {
            list: list.to_string(),
            template: id.to_string(),
        }),
        1 => {}
        count => result.errors.push(CheckError::TemplateWithExtraRemoveControls {
            list: list.to_string(),
            template: id.to_string(),
            count,
        }),
    }
}

fn check_tombstone_template(
    dom: &Dom,
    config: &WidgetConfig,
    list: &str,
    result: &mut CheckResult,
) {
    let id = &config.tombstone.template;
    match dom.get_element_by_id(id) {
        None => {
            let error = CheckError::MissingTombstoneTemplate {
                list: list.to_string(),
                template: id.clone(),
            };
            if !result.errors.contains(&error) {
                result.errors.push(error);
            }
        }
        Some(template) => {
            let warning = CheckWarning::TombstoneTemplateEnabled {
                template: id.clone(),
            };
            if !dom.node(template).disabled && !result.warnings.contains(&warning) {
                result.warnings.push(warning);
            }
        }
    }
}

fn check_dirty(dom: &Dom, config: &WidgetConfig, result: &mut CheckResult) {
    let dirty = &config.dirty;
    let Some(form) = dom.get_element_by_id(&dirty.form) else {
        result.warnings.push(CheckWarning::DirtyFormAbsent {
            form: dirty.form.clone(),
        });
        return;
    };
    for field in &dirty.fields {
        let found = dom.find_descendant(form, |n| {
            n.tag.is_field()
                && (n.name.as_deref() == Some(field.as_str())
                    || n.id.as_deref() == Some(field.as_str()))
        });
        if found.is_none() {
            result.errors.push(CheckError::MissingTrackedField {
                form: dirty.form.clone(),
                field: field.clone(),
            });
        }
    }
}
