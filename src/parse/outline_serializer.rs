use crate::model::dom::{Dom, Node, NodeId};

/// Serialize the attached tree back to outline text.
///
/// Attributes are emitted in canonical order (`#id`, classes, `name`,
/// `type`, `value`, `label`, `disabled`), so an outline written that way
/// round-trips byte for byte. The live value is written, not the default.
pub fn serialize_outline(dom: &Dom) -> String {
    let mut out = String::new();
    for &child in dom.children(dom.root()) {
        write_subtree(dom, child, 0, &mut out);
    }
    out
}

/// Serialize one subtree, starting at depth zero.
pub fn serialize_subtree(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    write_subtree(dom, id, 0, &mut out);
    out
}

fn write_subtree(dom: &Dom, id: NodeId, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&serialize_node(dom.node(id)));
    out.push('\n');
    for &child in dom.children(id) {
        write_subtree(dom, child, depth + 1, out);
    }
}

/// Single outline line for a node, without indentation.
pub fn serialize_node(node: &Node) -> String {
    let mut line = node.tag.as_str().to_string();
    if let Some(ref id) = node.id {
        line.push_str(&format!(" #{}", id));
    }
    for class in &node.classes {
        line.push_str(&format!(" .{}", class));
    }
    if let Some(ref name) = node.name {
        line.push_str(&format!(" name={}", quote(name)));
    }
    if let Some(ref input_type) = node.input_type {
        line.push_str(&format!(" type={}", quote(input_type)));
    }
    if !node.value.is_empty() {
        line.push_str(&format!(" value={}", quote(&node.value)));
    }
    if let Some(ref label) = node.label {
        line.push_str(&format!(" label={}", quote(label)));
    }
    if node.disabled {
        line.push_str(" disabled");
    }
    line
}

fn quote(value: &str) -> String {
    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if bare {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dom::{HIDDEN_CLASS, Tag};
    use crate::parse::outline_parser::parse_outline;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_canonical_outline() {
        let source = "\
form #block-edit-form
  input #block-name-input name=block-name-input value=Foo
  textarea name=block-description-textarea value=\"Bar baz\"
  button #update-block-button type=submit label=Save disabled
";
        let dom = parse_outline(source).unwrap();
        assert_eq!(serialize_outline(&dom), source);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("two words"), "\"two words\"");
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_serialize_built_tree() {
        let mut dom = Dom::new();
        let root = dom.root();
        let list = dom.create_child(root, Node::new(Tag::Div).with_id("emails"));
        let row = dom.create_child(list, Node::new(Tag::Div).with_class(HIDDEN_CLASS));
        dom.create_child(
            row,
            Node::new(Tag::Input)
                .with_name("removeEmails[]")
                .with_value("a@example.com"),
        );
        dom.create_child(
            list,
            Node::new(Tag::Button)
                .with_id("add-email")
                .with_type("button"),
        );
        assert_snapshot!(serialize_outline(&dom).trim_end(), @r"
        div #emails
          div .hidden
            input name=removeEmails[] value=a@example.com
          button #add-email type=button
        ");
    }
}
