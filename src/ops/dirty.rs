use serde::Serialize;
use tracing::trace;

use crate::events::listeners::{EventKind, Handler, Target};
use crate::model::dom::NodeId;
use crate::model::page::Page;
use crate::ops::WidgetError;

/// State of the watched submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    Enabled,
    Disabled,
}

/// Decide the submit state from `(current, baseline)` pairs.
///
/// Enabled iff at least one field differs from its baseline and no field
/// is empty. Level-triggered: depends on nothing but its input.
pub fn submit_state(fields: &[(&str, &str)]) -> SubmitState {
    let changed = fields.iter().any(|(current, baseline)| current != baseline);
    let filled = fields.iter().all(|(current, _)| !current.is_empty());
    if changed && filled {
        SubmitState::Enabled
    } else {
        SubmitState::Disabled
    }
}

/// Wire the watcher: the submit control starts disabled and every input
/// event reaching the form re-evaluates it.
pub fn attach(page: &mut Page) -> Result<(), WidgetError> {
    let (form, submit, _) = resolve(page)?;
    page.dom.node_mut(submit).disabled = true;
    page.listeners
        .add(EventKind::Input, Target::Node(form), Handler::DirtyCheck);
    Ok(())
}

/// Recompute the submit state and apply it to the submit control.
pub fn evaluate(page: &mut Page) -> Result<SubmitState, WidgetError> {
    let (_, submit, fields) = resolve(page)?;
    let pairs: Vec<(&str, &str)> = fields
        .iter()
        .map(|&f| {
            let node = page.dom.node(f);
            (node.value.as_str(), node.default_value.as_str())
        })
        .collect();
    let state = submit_state(&pairs);
    page.dom.node_mut(submit).disabled = state == SubmitState::Disabled;
    trace!(?state, "dirty check");
    Ok(state)
}

fn resolve(page: &Page) -> Result<(NodeId, NodeId, Vec<NodeId>), WidgetError> {
    let config = &page.config.dirty;
    let form = page
        .dom
        .get_element_by_id(&config.form)
        .ok_or_else(|| WidgetError::missing("form", &config.form))?;
    let submit = page
        .dom
        .get_element_by_id(&config.submit)
        .ok_or_else(|| WidgetError::missing("submit control", &config.submit))?;
    let fields = config
        .fields
        .iter()
        .map(|key| {
            form_field(page, form, key).ok_or_else(|| WidgetError::missing("tracked field", key))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((form, submit, fields))
}

/// Like `form[key]`: a field of the form matched by name, then by id.
fn form_field(page: &Page, form: NodeId, key: &str) -> Option<NodeId> {
    page.dom
        .find_descendant(form, |n| n.tag.is_field() && n.name.as_deref() == Some(key))
        .or_else(|| {
            page.dom
                .find_descendant(form, |n| n.tag.is_field() && n.id.as_deref() == Some(key))
        })
}
