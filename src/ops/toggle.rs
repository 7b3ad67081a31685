use tracing::debug;

use crate::events::listeners::{EventKind, Handler, Target};
use crate::model::dom::{HIDDEN_CLASS, NodeId};
use crate::model::page::Page;
use crate::ops::WidgetError;

/// Suffix pairing a trigger id `X` with its panel id `X-dropdown`
pub const PANEL_SUFFIX: &str = "-dropdown";

pub fn panel_id(trigger_id: &str) -> String {
    format!("{}{}", trigger_id, PANEL_SUFFIX)
}

/// Wire a dropdown: clicking the trigger flips its panel, and a page-level
/// click outside both trigger and panel hides it.
///
/// Returns `Ok(false)` when the trigger was already attached; the listener
/// table refuses duplicates so the panel is never toggled twice per click.
pub fn attach_toggle(page: &mut Page, trigger_id: &str) -> Result<bool, WidgetError> {
    let panel = panel_id(trigger_id);
    let trigger = page
        .dom
        .get_element_by_id(trigger_id)
        .ok_or_else(|| WidgetError::missing("dropdown trigger", trigger_id))?;
    if page.dom.get_element_by_id(&panel).is_none() {
        return Err(WidgetError::missing("dropdown panel", &panel));
    }

    let toggled = page.listeners.add(
        EventKind::Click,
        Target::Node(trigger),
        Handler::ToggleVisibility {
            panel: panel.clone(),
        },
    );
    let dismissed = page.listeners.add(
        EventKind::Click,
        Target::Document,
        Handler::DismissOutside {
            panel,
            trigger: trigger_id.to_string(),
        },
    );
    Ok(toggled || dismissed)
}

/// Flip the hidden state of a panel. Returns true if it is now visible.
pub fn toggle_visibility(page: &mut Page, panel_id: &str) -> Result<bool, WidgetError> {
    let panel = page
        .dom
        .get_element_by_id(panel_id)
        .ok_or_else(|| WidgetError::missing("dropdown panel", panel_id))?;
    let node = page.dom.node_mut(panel);
    node.toggle_class(HIDDEN_CLASS);
    let visible = !node.is_hidden();
    debug!(panel = panel_id, visible, "toggled panel");
    Ok(visible)
}

/// Hide the panel unless the click target lies inside the trigger or the
/// panel. Returns true if the click counted as outside.
pub fn dismiss_outside(
    page: &mut Page,
    target: NodeId,
    panel_id: &str,
    trigger_id: &str,
) -> Result<bool, WidgetError> {
    let trigger = page
        .dom
        .get_element_by_id(trigger_id)
        .ok_or_else(|| WidgetError::missing("dropdown trigger", trigger_id))?;
    if page.dom.contains(trigger, target) {
        return Ok(false);
    }
    let panel = page
        .dom
        .get_element_by_id(panel_id)
        .ok_or_else(|| WidgetError::missing("dropdown panel", panel_id))?;
    if page.dom.contains(panel, target) {
        return Ok(false);
    }
    page.dom.node_mut(panel).set_hidden(true);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::WidgetConfig;
    use crate::parse::parse_outline;

    const MENU_PAGE: &str = "\
div #toolbar
  button #create-question-button label=Create
  div #create-question-button-dropdown .hidden
    button #new-text label=Text
p #elsewhere
";

    fn page() -> Page {
        Page::new(parse_outline(MENU_PAGE).unwrap(), WidgetConfig::default())
    }

    fn panel_hidden(page: &Page) -> bool {
        let panel = page
            .dom
            .get_element_by_id("create-question-button-dropdown")
            .unwrap();
        page.dom.node(panel).is_hidden()
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut page = page();
        assert!(attach_toggle(&mut page, "create-question-button").unwrap());
        assert!(!attach_toggle(&mut page, "create-question-button").unwrap());
        assert_eq!(page.listeners.len(), 2);
    }

    #[test]
    fn test_attach_requires_trigger_and_panel() {
        let mut page = page();
        assert_eq!(
            attach_toggle(&mut page, "missing").unwrap_err(),
            WidgetError::missing("dropdown trigger", "missing")
        );
        assert_eq!(
            attach_toggle(&mut page, "elsewhere").unwrap_err(),
            WidgetError::missing("dropdown panel", "elsewhere-dropdown")
        );
        assert!(page.listeners.is_empty());
    }

    #[test]
    fn test_toggle_flips() {
        let mut page = page();
        assert!(toggle_visibility(&mut page, "create-question-button-dropdown").unwrap());
        assert!(!panel_hidden(&page));
        assert!(!toggle_visibility(&mut page, "create-question-button-dropdown").unwrap());
        assert!(panel_hidden(&page));
    }

    #[test]
    fn test_dismiss_checks_trigger_then_panel() {
        let mut page = page();
        toggle_visibility(&mut page, "create-question-button-dropdown").unwrap();
        let trigger = page.dom.get_element_by_id("create-question-button").unwrap();
        let inside = page.dom.get_element_by_id("new-text").unwrap();
        let outside = page.dom.get_element_by_id("elsewhere").unwrap();
        let args = ("create-question-button-dropdown", "create-question-button");

        assert!(!dismiss_outside(&mut page, trigger, args.0, args.1).unwrap());
        assert!(!dismiss_outside(&mut page, inside, args.0, args.1).unwrap());
        assert!(!panel_hidden(&page));
        assert!(dismiss_outside(&mut page, outside, args.0, args.1).unwrap());
        assert!(panel_hidden(&page));
    }
}
