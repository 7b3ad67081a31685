use tracing::{debug, info, warn};

use crate::events::listeners::{EventKind, Handler, Target};
use crate::model::config::ExistingRemoval;
use crate::model::dom::NodeId;
use crate::model::entity::EntityState;
use crate::model::page::Page;
use crate::ops::{WidgetError, clamp, dirty, toggle};

/// Outcome of wiring a page.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Human-readable names of the widgets that were attached
    pub attached: Vec<String>,
    /// Attachments that were skipped, with the reason
    pub skipped: Vec<(String, WidgetError)>,
}

impl InitReport {
    fn skip(&mut self, widget: String, err: WidgetError) {
        debug!(%widget, error = %err, "widget not attached");
        self.skipped.push((widget, err));
    }
}

/// Wire every configured widget on the page.
///
/// Each widget is attached independently: a missing node only skips that
/// widget and is recorded in the report, never aborting the rest.
pub fn initialize(page: &mut Page) -> InitReport {
    let mut report = InitReport::default();

    let triggers: Vec<String> = page
        .config
        .dropdowns
        .iter()
        .map(|d| d.trigger.clone())
        .collect();
    for trigger in triggers {
        let widget = format!("dropdown {}", trigger);
        match toggle::attach_toggle(page, &trigger) {
            Ok(_) => report.attached.push(widget),
            Err(e) => report.skip(widget, e),
        }
    }

    let cards = clamp::attach(page);
    if cards > 0 {
        report.attached.push(format!("clamp ({} cards)", cards));
    }

    match dirty::attach(page) {
        Ok(()) => report.attached.push("dirty watcher".to_string()),
        Err(e) => report.skip("dirty watcher".to_string(), e),
    }

    for index in 0..page.config.lists.len() {
        attach_list(page, index, &mut report);
    }

    info!(
        attached = report.attached.len(),
        skipped = report.skipped.len(),
        "page initialized"
    );
    report
}

/// Wire one list: its add control, the remove controls of server-rendered
/// rows, and the entity list seeded from the container's current rows.
fn attach_list(page: &mut Page, index: usize, report: &mut InitReport) {
    let config = page.config.lists[index].clone();
    let widget = format!("list {}", config.name);

    let handler = match config.existing {
        ExistingRemoval::Remove => Handler::RemoveTransient,
        ExistingRemoval::Retire => Handler::RetireRow,
        ExistingRemoval::Tombstone => Handler::MarkDeleted,
    };
    let controls = page.dom.elements_with_class(&config.remove_class);
    for &control in &controls {
        page.listeners
            .add(EventKind::Click, Target::Node(control), handler.clone());
    }

    let Some(container) = page.dom.get_element_by_id(&config.container) else {
        report.skip(widget, WidgetError::missing("container", &config.container));
        return;
    };
    let anchor = match config.anchor.as_deref() {
        Some(anchor_id) => match page.dom.get_element_by_id(anchor_id) {
            Some(anchor) if page.dom.parent(anchor) == Some(container) => Some(anchor),
            Some(_) => {
                report.skip(
                    widget,
                    WidgetError::AnchorOutsideContainer {
                        anchor: anchor_id.to_string(),
                        container: config.container.clone(),
                    },
                );
                return;
            }
            None => {
                report.skip(widget, WidgetError::missing("anchor", anchor_id));
                return;
            }
        },
        None => None,
    };

    seed_entities(
        page,
        container,
        anchor,
        &config.template,
        &controls,
        config.existing,
    );

    if config.existing == ExistingRemoval::Tombstone
        && page.lists[&container]
            .records()
            .iter()
            .any(|r| matches!(r.state, EntityState::Persisted { .. }))
        && page
            .dom
            .get_element_by_id(&page.config.tombstone.template)
            .is_none()
    {
        warn!(
            list = %config.name,
            template = %page.config.tombstone.template,
            "tombstone template missing; deletions will be synthesized at submission"
        );
        let template = page.config.tombstone.template.clone();
        report.skip(
            format!("tombstones for {}", config.name),
            WidgetError::missing("tombstone template", &template),
        );
    }

    match page.dom.get_element_by_id(&config.add_button) {
        Some(add) => {
            page.listeners
                .add(EventKind::Click, Target::Node(add), Handler::Mount { list: index });
            report.attached.push(widget);
        }
        None => report.skip(
            widget,
            WidgetError::missing("add control", &config.add_button),
        ),
    }
}

/// Register the rows already in the container, in document order.
fn seed_entities(
    page: &mut Page,
    container: NodeId,
    anchor: Option<NodeId>,
    template_id: &str,
    controls: &[NodeId],
    existing: ExistingRemoval,
) {
    let rows: Vec<NodeId> = page
        .dom
        .children(container)
        .iter()
        .copied()
        .filter(|&row| {
            Some(row) != anchor && page.dom.node(row).id.as_deref() != Some(template_id)
        })
        .collect();

    let mut entries = Vec::new();
    for row in rows {
        let control = controls
            .iter()
            .copied()
            .find(|&c| page.dom.parent(c) == Some(row));
        let Some(control) = control else {
            continue;
        };
        let state = match existing {
            ExistingRemoval::Remove => EntityState::Transient,
            ExistingRemoval::Retire | ExistingRemoval::Tombstone => {
                match row_identity(page, row, control, existing) {
                    Some(id) => EntityState::Persisted { id },
                    None => EntityState::Transient,
                }
            }
        };
        entries.push((row, state));
    }

    // rows seen by an earlier initialization keep their current state
    let list = page.list_mut(container, anchor);
    for (row, state) in entries {
        if list.state(row).is_none() {
            list.push(row, state);
        }
    }
}

/// Identity of a server-rendered row: its remove control's id. Retired rows
/// fall back to the value of the row's first input, which is what they
/// submit; tombstones can only carry the control's id.
fn row_identity(
    page: &Page,
    row: NodeId,
    control: NodeId,
    existing: ExistingRemoval,
) -> Option<String> {
    let control_id = page.dom.node(control).id.clone();
    let identity = match existing {
        ExistingRemoval::Retire => control_id.or_else(|| {
            page.dom
                .find_descendant(row, |n| n.tag.is_field())
                .map(|input| page.dom.node(input).value.clone())
        }),
        _ => control_id,
    };
    identity.filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::WidgetConfig;
    use crate::parse::parse_outline;
    use pretty_assertions::assert_eq;

    const ADMIN_PAGE: &str = "\
div #question-settings
  div
    input name=options[] value=Red
    button .multi-option-question-field-remove-button type=button
  button #add-new-option type=button
div #multi-option-question-answer-template .hidden
  input name=options[]
  button type=button
div #enumerator-fields
  div
    input name=entityName[] value=Alice
    button #e-1 .cf-enumerator-delete-button type=button
  div
    input name=entityName[] value=Bob
    button #e-2 .cf-enumerator-delete-button type=button
button #enumerator-field-add-button type=button
";

    fn page(source: &str) -> Page {
        Page::new(parse_outline(source).unwrap(), WidgetConfig::default())
    }

    #[test]
    fn test_initialize_wires_present_widgets_and_skips_missing() {
        let mut page = page(ADMIN_PAGE);
        let report = initialize(&mut page);

        assert_eq!(
            report.attached,
            vec!["list multi-option".to_string(), "list enumerator".to_string()]
        );
        let skipped: Vec<&str> = report.skipped.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(
            skipped,
            vec![
                "dropdown create-question-button",
                "dirty watcher",
                "list program-admin",
                "tombstones for enumerator",
            ]
        );
    }

    #[test]
    fn test_seeded_entities_follow_removal_mode() {
        let mut page = page(ADMIN_PAGE);
        initialize(&mut page);

        let options: Vec<EntityState> = page
            .list_named("multi-option")
            .unwrap()
            .records()
            .into_iter()
            .map(|r| r.state)
            .collect();
        assert_eq!(options, vec![EntityState::Transient]);

        let people: Vec<EntityState> = page
            .list_named("enumerator")
            .unwrap()
            .records()
            .into_iter()
            .map(|r| r.state)
            .collect();
        assert_eq!(
            people,
            vec![
                EntityState::Persisted { id: "e-1".into() },
                EntityState::Persisted { id: "e-2".into() },
            ]
        );
    }

    #[test]
    fn test_remove_controls_get_mode_handler() {
        let mut page = page(ADMIN_PAGE);
        initialize(&mut page);
        let e1 = page.dom.get_element_by_id("e-1").unwrap();
        assert_eq!(
            page.listeners.handlers(EventKind::Click, Target::Node(e1)),
            &[Handler::MarkDeleted]
        );
        let add = page
            .dom
            .get_element_by_id("enumerator-field-add-button")
            .unwrap();
        assert_eq!(
            page.listeners.handlers(EventKind::Click, Target::Node(add)),
            &[Handler::Mount { list: 2 }]
        );
    }

    #[test]
    fn test_initialize_twice_adds_no_listeners() {
        let mut page = page(ADMIN_PAGE);
        initialize(&mut page);
        let count = page.listeners.len();
        initialize(&mut page);
        assert_eq!(page.listeners.len(), count);
    }

    #[test]
    fn test_empty_page_initializes_without_attachments() {
        let mut page = page("");
        let report = initialize(&mut page);
        assert!(report.attached.is_empty());
        assert_eq!(report.skipped.len(), 5);
    }
}
