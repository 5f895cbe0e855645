use pinote::dom::dom_model::{Document, NodeKind};
use pinote::dom::query::DomQuery;
use pinote::dom::snapshot::SnapshotError;
use pinote::selector::builder::SelectorBuilder;

use crate::common::fixtures::SHOP_SNAPSHOT_JSON;

mod common;

// ============================================================================
// Loading
// ============================================================================

#[test]
fn snapshot_builds_document_tree() {
    let doc = Document::from_json(SHOP_SNAPSHOT_JSON).unwrap();

    assert_eq!(doc.url.as_deref(), Some("https://shop.example/mugs"));
    assert_eq!(doc.title, "Mugs");
    assert_eq!(doc.element(doc.root()).unwrap().tag, "html");

    let body = doc.body().unwrap();
    let tags: Vec<String> = doc
        .element_children(body)
        .into_iter()
        .map(|c| doc.element(c).unwrap().tag.clone())
        .collect();
    assert_eq!(tags, vec!["main", "pinote-host"]);
}

#[test]
fn snapshot_keeps_attributes_rect_and_style() {
    let doc = Document::from_json(SHOP_SNAPSHOT_JSON).unwrap();
    let button = doc.query_first("button.primary").unwrap().unwrap();
    let el = doc.element(button).unwrap();

    assert_eq!(el.classes(), vec!["cta", "primary"]);
    assert_eq!(el.rect.x, 10.4);
    assert_eq!(el.rect.height, 32.0);
    assert_eq!(el.style.get("cursor").map(String::as_str), Some("pointer"));
    assert_eq!(doc.text_content(button), "Buy now");

    let details = doc.query_first("button:nth-child(3)").unwrap().unwrap();
    assert_eq!(doc.element(details).unwrap().rect.width, 0.0);
}

#[test]
fn text_children_become_text_nodes() {
    let doc = Document::from_json(SHOP_SNAPSHOT_JSON).unwrap();
    let heading = doc.query_first("#headline").unwrap().unwrap();
    let node = doc.node(heading).unwrap();

    assert_eq!(node.children.len(), 1);
    match &doc.node(node.children[0]).unwrap().kind {
        NodeKind::Text(text) => assert_eq!(text, "Our mugs"),
        other => panic!("expected text node, got {other:?}"),
    }
}

#[test]
fn text_root_is_rejected() {
    let err = Document::from_json(r#"{ "root": "just text" }"#).unwrap_err();
    assert!(matches!(err, SnapshotError::TextRoot));
}

#[test]
fn empty_tag_is_rejected() {
    let json = r#"{ "root": { "tag": "html", "children": [{ "tag": "  " }] } }"#;
    let err = Document::from_json(json).unwrap_err();
    assert!(matches!(err, SnapshotError::EmptyTag));
}

#[test]
fn invalid_json_is_reported() {
    let err = Document::from_json("{ \"root\": ").unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.json");
    std::fs::write(&path, SHOP_SNAPSHOT_JSON).unwrap();

    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.title, "Mugs");

    let err = Document::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SnapshotError::Io { .. }));
}

// ============================================================================
// Injected UI exclusion
// ============================================================================

#[test]
fn injected_subtree_is_hidden_from_queries() {
    let doc = Document::from_json(SHOP_SNAPSHOT_JSON).unwrap();

    assert_eq!(doc.query_all("button.primary").unwrap().len(), 1);
    assert_eq!(doc.query_all("pinote-host").unwrap().len(), 0);
    assert_eq!(doc.elements_by_tag(Some("button")).len(), 2);
    assert_eq!(doc.elements().len(), 8, "the raw tree still holds every element");
}

#[test]
fn selectors_ignore_injected_duplicates() {
    let doc = Document::from_json(SHOP_SNAPSHOT_JSON).unwrap();
    let button = doc.query_first("button.primary").unwrap().unwrap();

    assert_eq!(SelectorBuilder::new(&doc).generate(button), "button.primary");
}
