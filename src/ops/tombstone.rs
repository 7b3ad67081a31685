use tracing::{debug, warn};

use crate::model::dom::NodeId;
use crate::model::entity::EntityState;
use crate::model::page::Page;
use crate::ops::WidgetError;
use crate::ops::remove::remove_transient;

/// Soft-delete the persisted entity owning `remove_control`.
///
/// The enclosing instance stays in the tree so list order is preserved. It
/// is hidden, recorded as [`EntityState::Deleted`], and gets one enabled
/// copy of the tombstone template carrying the control's id as its value.
/// The identity is the remove control's element id.
///
/// A transient instance is detached instead, before any identity is
/// required. Calling this again for a deleted entity does nothing, so an instance
/// never carries more than one tombstone. If the tombstone template is
/// missing the deletion is still recorded (and synthesized at submission),
/// but `MissingNode` is returned so the gap is visible.
pub fn mark_deleted(page: &mut Page, remove_control: NodeId) -> Result<Option<NodeId>, WidgetError> {
    let instance = page.dom.parent(remove_control).ok_or(WidgetError::Detached)?;

    let known = match page.entity(instance) {
        Some(EntityState::Deleted { id, .. }) => {
            debug!(%id, "entity already marked deleted");
            return Ok(None);
        }
        Some(EntityState::Transient) => {
            debug!(?instance, "entity was never persisted; detaching");
            remove_transient(page, instance)?;
            return Ok(None);
        }
        Some(_) => true,
        None => false,
    };

    let identity = page
        .dom
        .node(remove_control)
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(WidgetError::MissingIdentity)?;

    // Rendered rows outside any registered list still get tracked
    if !known && let Some(container) = page.dom.parent(instance) {
        page.list_mut(container, None).push(
            instance,
            EntityState::Persisted {
                id: identity.clone(),
            },
        );
    }

    page.dom.node_mut(instance).set_hidden(true);
    if let Some(container) = page.owning_list(instance)
        && let Some(list) = page.lists.get_mut(&container)
    {
        list.mark_deleted(instance);
    }

    let template_id = page.config.tombstone.template.clone();
    let Some(template) = page.dom.get_element_by_id(&template_id) else {
        warn!(
            id = %identity,
            template = %template_id,
            "tombstone template missing; deletion will be synthesized at submission"
        );
        return Err(WidgetError::missing("tombstone template", &template_id));
    };

    let marker = page.dom.deep_clone(template);
    {
        let node = page.dom.node_mut(marker);
        node.set_rendered_value(&identity);
        node.id = None;
        node.disabled = false;
    }
    page.dom.append_child(instance, marker);

    if let Some(EntityState::Deleted { marker: slot, .. }) = page.entity_mut(instance) {
        *slot = Some(marker);
    }

    debug!(id = %identity, ?instance, "entity marked deleted");
    Ok(Some(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::WidgetConfig;
    use crate::events::click;
    use crate::model::dom::{Node, Tag};
    use crate::ops::init::initialize;
    use crate::ops::retire::retire_row;
    use crate::ops::submit::{entity_records, snapshot};
    use crate::parse::parse_outline;
    use pretty_assertions::assert_eq;

    const ENUMERATOR_PAGE: &str = "\
input #enumerator-delete-template .hidden name=delete[] type=hidden disabled
form #enumerator-form
  div #enumerator-fields
    div .cf-enumerator-field
      input name=entityName[] value=Alice
      button #e-1 .cf-enumerator-delete-button type=button
    div .cf-enumerator-field
      input name=entityName[] value=Bob
      button #e-2 .cf-enumerator-delete-button type=button
";

    fn page() -> Page {
        Page::new(parse_outline(ENUMERATOR_PAGE).unwrap(), WidgetConfig::default())
    }

    #[test]
    fn test_mark_deleted_hides_and_appends_tombstone() {
        let mut page = page();
        let control = page.dom.get_element_by_id("e-2").unwrap();
        let row = page.dom.parent(control).unwrap();
        let before = page.dom.children(row).len();

        let marker = mark_deleted(&mut page, control).unwrap().unwrap();

        assert!(page.dom.is_attached(row));
        assert!(page.dom.node(row).is_hidden());
        assert_eq!(page.dom.children(row).len(), before + 1);
        assert_eq!(page.dom.children(row).last(), Some(&marker));
        let tombstone = page.dom.node(marker);
        assert_eq!(tombstone.value, "e-2");
        assert!(!tombstone.disabled);
        assert_eq!(tombstone.id, None);
        assert_eq!(
            page.entity(row),
            Some(&EntityState::Deleted {
                id: "e-2".into(),
                marker: Some(marker)
            })
        );
    }

    #[test]
    fn test_deleted_row_still_submits() {
        let mut page = page();
        let form = page.dom.get_element_by_id("enumerator-form").unwrap();
        let control = page.dom.get_element_by_id("e-1").unwrap();
        mark_deleted(&mut page, control).unwrap();
        let submission = snapshot(&page, Some(form));
        assert_eq!(
            submission.pairs(),
            vec![
                ("entityName[]", "Alice"),
                ("delete[]", "e-1"),
                ("entityName[]", "Bob"),
            ]
        );
    }

    #[test]
    fn test_second_call_adds_nothing() {
        let mut page = page();
        let control = page.dom.get_element_by_id("e-1").unwrap();
        let row = page.dom.parent(control).unwrap();
        mark_deleted(&mut page, control).unwrap();
        let count = page.dom.children(row).len();
        assert_eq!(mark_deleted(&mut page, control).unwrap(), None);
        assert_eq!(page.dom.children(row).len(), count);
    }

    #[test]
    fn test_missing_template_still_records_deletion() {
        let mut page = page();
        let template = page
            .dom
            .get_element_by_id("enumerator-delete-template")
            .unwrap();
        page.dom.detach(template);
        let form = page.dom.get_element_by_id("enumerator-form").unwrap();
        let control = page.dom.get_element_by_id("e-1").unwrap();
        let row = page.dom.parent(control).unwrap();

        assert_eq!(
            mark_deleted(&mut page, control).unwrap_err(),
            WidgetError::missing("tombstone template", "enumerator-delete-template")
        );
        assert!(page.dom.node(row).is_hidden());
        let submission = snapshot(&page, Some(form));
        assert_eq!(submission.values("delete[]"), vec!["e-1"]);
    }

    #[test]
    fn test_seeded_rows_without_control_id() {
        let mut page = Page::new(
            parse_outline(
                "\
input #enumerator-delete-template name=delete[] type=hidden disabled
form #enumerator-form
  div #enumerator-fields
    div
      input name=entityName[] value=Alice
      button .cf-enumerator-delete-button type=button
    div
      input name=entityName[]
      button .cf-enumerator-delete-button type=button
button #enumerator-field-add-button type=button
",
            )
            .unwrap(),
            WidgetConfig::default(),
        );
        initialize(&mut page);
        let states: Vec<EntityState> = entity_records(&page, "enumerator")
            .into_iter()
            .map(|r| r.state)
            .collect();
        assert_eq!(states, vec![EntityState::Transient, EntityState::Transient]);

        let controls = page.dom.elements_with_class("cf-enumerator-delete-button");
        let rows: Vec<NodeId> = controls
            .iter()
            .map(|&c| page.dom.parent(c).unwrap())
            .collect();
        for &control in &controls {
            let report = click(&mut page, control);
            assert!(report.errors.is_empty());
        }

        assert!(rows.iter().all(|&row| !page.dom.is_attached(row)));
        assert!(entity_records(&page, "enumerator").is_empty());
        let form = page.dom.get_element_by_id("enumerator-form").unwrap();
        assert!(snapshot(&page, Some(form)).fields.is_empty());
    }

    #[test]
    fn test_transient_instance_is_detached_without_identity() {
        let mut page = page();
        let fields = page.dom.get_element_by_id("enumerator-fields").unwrap();
        let row = page.dom.create_child(fields, Node::new(Tag::Div));
        let control = page
            .dom
            .create_child(row, Node::new(Tag::Button).with_type("button"));
        page.list_mut(fields, None).push(row, EntityState::Transient);

        assert_eq!(mark_deleted(&mut page, control).unwrap(), None);
        assert!(!page.dom.is_attached(row));
        assert_eq!(page.entity(row), None);
    }

    #[test]
    fn test_retired_entity_can_be_tombstoned() {
        let mut page = Page::new(
            parse_outline(
                "\
input #enumerator-delete-template name=delete[] type=hidden disabled
div #program-admin-emails
  div
    input name=removeAdminEmails[] value=a@example.com disabled
    button #admin-1 .cf-program-admin-remove-button type=button
  button #add-program-admin-button type=button
",
            )
            .unwrap(),
            WidgetConfig::default(),
        );
        initialize(&mut page);
        let control = page.dom.get_element_by_id("admin-1").unwrap();
        let row = page.dom.parent(control).unwrap();
        retire_row(&mut page, control).unwrap();
        assert_eq!(
            page.entity(row),
            Some(&EntityState::Retired { id: "admin-1".into() })
        );

        let marker = mark_deleted(&mut page, control).unwrap().unwrap();

        assert_eq!(
            page.entity(row),
            Some(&EntityState::Deleted {
                id: "admin-1".into(),
                marker: Some(marker)
            })
        );
    }

    #[test]
    fn test_control_without_identity() {
        let mut page = Page::new(
            parse_outline("div\n  div\n    button type=button\n").unwrap(),
            WidgetConfig::default(),
        );
        let root = page.dom.root();
        let control = page
            .dom
            .find_descendant(root, |n| n.is_remove_control())
            .unwrap();
        assert_eq!(
            mark_deleted(&mut page, control).unwrap_err(),
            WidgetError::MissingIdentity
        );
    }
}
