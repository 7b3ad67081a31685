use serde::Serialize;

use crate::model::dom::{Dom, Node, NodeId};
use crate::model::entity::{EntityRecord, EntityState};
use crate::model::page::Page;
use crate::ops::init::InitReport;
use crate::ops::submit::{Submission, entity_records};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// A node with its subtree, for `fw render --json`
#[derive(Serialize)]
pub struct NodeJson<'a> {
    #[serde(flatten)]
    pub node: &'a Node,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeJson<'a>>,
}

pub fn node_json(dom: &Dom, id: NodeId) -> NodeJson<'_> {
    NodeJson {
        node: dom.node(id),
        children: dom.children(id).iter().map(|&c| node_json(dom, c)).collect(),
    }
}

#[derive(Serialize)]
pub struct ListJson {
    pub name: String,
    pub entities: Vec<EntityRecord>,
}

#[derive(Serialize)]
pub struct SkippedJson {
    pub widget: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct RunJson {
    /// Page outline after all steps
    pub page: String,
    pub attached: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedJson>,
    pub lists: Vec<ListJson>,
    pub submission: Submission,
    /// Handler failures raised while replaying steps
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub handler_errors: Vec<String>,
}

pub fn lists_json(page: &Page) -> Vec<ListJson> {
    page.config
        .lists
        .iter()
        .filter(|l| page.list_named(&l.name).is_some())
        .map(|l| ListJson {
            name: l.name.clone(),
            entities: entity_records(page, &l.name),
        })
        .collect()
}

pub fn skipped_json(report: &InitReport) -> Vec<SkippedJson> {
    report
        .skipped
        .iter()
        .map(|(widget, e)| SkippedJson {
            widget: widget.clone(),
            reason: e.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `name=value` per line; synthesized tombstones are flagged.
pub fn format_submission(submission: &Submission) -> String {
    let mut out = String::new();
    for field in &submission.fields {
        out.push_str(&format!("{}={}", field.name, field.value));
        if field.synthesized {
            out.push_str("  (synthesized)");
        }
        out.push('\n');
    }
    out
}

/// One line per entity: `  [index] state id`
pub fn format_lists(lists: &[ListJson]) -> String {
    let mut out = String::new();
    for list in lists {
        out.push_str(&format!("{}:\n", list.name));
        if list.entities.is_empty() {
            out.push_str("  (empty)\n");
        }
        for record in &list.entities {
            let state = match &record.state {
                EntityState::Transient => "transient",
                EntityState::Persisted { .. } => "persisted",
                EntityState::Retired { .. } => "retired",
                EntityState::Deleted { .. } => "deleted",
            };
            match record.state.identity() {
                Some(id) => out.push_str(&format!("  [{}] {} {}\n", record.index, state, id)),
                None => out.push_str(&format!("  [{}] {}\n", record.index, state)),
            }
        }
    }
    out
}
