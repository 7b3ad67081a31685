use formwidgets::parse::{parse_outline, serialize_outline, serialize_subtree};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn read_fixture(fixture_name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", fixture_name, e))
}

/// Helper: load a fixture file, parse it, serialize it, and assert byte-for-byte equality
fn assert_page_round_trip(fixture_name: &str) {
    let source = read_fixture(fixture_name);
    let dom = parse_outline(&source)
        .unwrap_or_else(|e| panic!("Could not parse fixture {}: {}", fixture_name, e));
    let output = serialize_outline(&dom);

    assert_eq!(
        output, source,
        "Round-trip failed for fixture: {}",
        fixture_name
    );
}

// ============================================================================
// Fixture round-trip tests
// ============================================================================

#[test]
fn round_trip_question_settings() {
    assert_page_round_trip("question_settings.page");
}

#[test]
fn round_trip_enumerator() {
    assert_page_round_trip("enumerator.page");
}

#[test]
fn round_trip_program_admins() {
    assert_page_round_trip("program_admins.page");
}

#[test]
fn round_trip_block_edit() {
    assert_page_round_trip("block_edit.page");
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn comments_and_blank_lines_are_dropped() {
    let source = "\
// saved rows

div #enumerator-fields
  // first member
  div
    input name=entityName[] value=Alice
";
    let dom = parse_outline(source).unwrap();
    assert_eq!(
        serialize_outline(&dom),
        "div #enumerator-fields\n  div\n    input name=entityName[] value=Alice\n"
    );
}

#[test]
fn attributes_are_written_in_canonical_order() {
    let dom = parse_outline(
        "button disabled label=\"Add member\" type=button .primary #enumerator-field-add-button\n",
    )
    .unwrap();
    assert_eq!(
        serialize_outline(&dom),
        "button #enumerator-field-add-button .primary type=button label=\"Add member\" disabled\n"
    );
}

#[test]
fn quoted_values_survive_escapes() {
    let source = "input name=title value=\"say \\\"hi\\\" \\\\ bye\"\n";
    let dom = parse_outline(source).unwrap();
    let input = dom.children(dom.root())[0];
    assert_eq!(dom.node(input).value, "say \"hi\" \\ bye");
    assert_eq!(serialize_outline(&dom), source);
}

#[test]
fn subtree_serializes_from_depth_zero() {
    let source = read_fixture("enumerator.page");
    let dom = parse_outline(&source).unwrap();
    let container = dom.get_element_by_id("enumerator-fields").unwrap();
    let first_row = dom.children(container)[0];
    assert_eq!(
        serialize_subtree(&dom, first_row),
        "\
div .cf-enumerator-field
  input name=entityName[] value=Alice
  button #e-101 .cf-enumerator-delete-button type=button label=Remove
"
    );
}
