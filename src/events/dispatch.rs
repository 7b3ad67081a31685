use tracing::{debug, trace};

use crate::events::listeners::{EventKind, Handler, Target};
use crate::model::dom::NodeId;
use crate::model::page::Page;
use crate::ops::{WidgetError, clamp, dirty, mount, remove, retire, toggle, tombstone};

/// A user event aimed at one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
}

/// What happened while dispatching one event
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Number of handlers run
    pub invoked: usize,
    /// Handler failures; logged and otherwise ignored
    pub errors: Vec<WidgetError>,
}

/// Deliver an event: handlers on the target, then on each ancestor up to the
/// root, then page-level handlers if the target is attached.
///
/// The propagation path is fixed before any handler runs, so a handler that
/// detaches part of the tree does not change who else hears the event.
/// Handler errors never abort dispatch.
pub fn dispatch(page: &mut Page, event: Event) -> DispatchReport {
    let mut report = DispatchReport::default();
    let path = page.dom.ancestors(event.target);
    let reaches_document = page.dom.is_attached(event.target);

    for current in path {
        let handlers = page
            .listeners
            .handlers(event.kind, Target::Node(current))
            .to_vec();
        for handler in handlers {
            run(page, &handler, event.target, current, &mut report);
        }
    }

    if reaches_document {
        let root = page.dom.root();
        let handlers = page
            .listeners
            .handlers(event.kind, Target::Document)
            .to_vec();
        for handler in handlers {
            run(page, &handler, event.target, root, &mut report);
        }
    }

    trace!(?event, invoked = report.invoked, "dispatched");
    report
}

/// Click a node.
pub fn click(page: &mut Page, target: NodeId) -> DispatchReport {
    dispatch(
        page,
        Event {
            kind: EventKind::Click,
            target,
        },
    )
}

/// Replace a field's live value and fire an input event on it.
pub fn type_value(page: &mut Page, target: NodeId, value: &str) -> DispatchReport {
    page.dom.node_mut(target).value = value.to_string();
    dispatch(
        page,
        Event {
            kind: EventKind::Input,
            target,
        },
    )
}

fn run(
    page: &mut Page,
    handler: &Handler,
    target: NodeId,
    current: NodeId,
    report: &mut DispatchReport,
) {
    report.invoked += 1;
    let result = match handler {
        Handler::Mount { list } => mount::mount_list(page, *list).map(drop),
        Handler::RemoveTransient => remove::remove_for_control(page, current).map(drop),
        Handler::MarkDeleted => tombstone::mark_deleted(page, current).map(drop),
        Handler::RetireRow => retire::retire_row(page, current).map(drop),
        Handler::ToggleVisibility { panel } => toggle::toggle_visibility(page, panel).map(drop),
        Handler::DismissOutside { panel, trigger } => {
            toggle::dismiss_outside(page, target, panel, trigger).map(drop)
        }
        Handler::DirtyCheck => dirty::evaluate(page).map(drop),
        Handler::ExpandClamp => {
            clamp::expand(page, current);
            Ok(())
        }
    };
    if let Err(e) = result {
        debug!(?handler, error = %e, "handler degraded to no-op");
        report.errors.push(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::WidgetConfig;
    use crate::ops::init::initialize;
    use crate::parse::parse_outline;

    #[test]
    fn test_input_bubbles_to_form() {
        let mut page = Page::new(
            parse_outline(
                "\
form #block-edit-form
  div
    input name=block-name-input value=Foo
  textarea name=block-description-textarea value=Bar
  button #update-block-button type=submit
",
            )
            .unwrap(),
            WidgetConfig::default(),
        );
        initialize(&mut page);
        let form = page.dom.get_element_by_id("block-edit-form").unwrap();
        let name = page.dom.descendants(form)[1];
        let submit = page.dom.get_element_by_id("update-block-button").unwrap();

        let report = type_value(&mut page, name, "Foo2");
        assert_eq!(report.invoked, 1);
        assert!(report.errors.is_empty());
        assert!(!page.dom.node(submit).disabled);
    }

    #[test]
    fn test_click_on_detached_node_skips_document() {
        let mut page = Page::new(
            parse_outline(
                "\
button #create-question-button
div #create-question-button-dropdown
p #loose
",
            )
            .unwrap(),
            WidgetConfig::default(),
        );
        initialize(&mut page);
        let loose = page.dom.get_element_by_id("loose").unwrap();
        page.dom.detach(loose);
        let report = click(&mut page, loose);
        assert_eq!(report.invoked, 0);
        let panel = page
            .dom
            .get_element_by_id("create-question-button-dropdown")
            .unwrap();
        assert!(!page.dom.node(panel).is_hidden());
    }

    #[test]
    fn test_handler_errors_are_collected_not_raised() {
        let mut page = Page::new(
            parse_outline("button #add-new-option\n").unwrap(),
            WidgetConfig::default(),
        );
        let add = page.dom.get_element_by_id("add-new-option").unwrap();
        page.listeners
            .add(EventKind::Click, Target::Node(add), Handler::Mount { list: 0 });
        page.listeners
            .add(EventKind::Click, Target::Node(add), Handler::ExpandClamp);
        let report = click(&mut page, add);
        assert_eq!(report.invoked, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(page.dom.node(add).has_class("line-clamp-none"));
    }
}
