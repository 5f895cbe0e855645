use pinote::dom::dom_model::{Document, NodeId};
use pinote::dom::query::{DomQuery, count_matches, is_unique};
use pinote::selector::builder::{ROOT_SELECTOR, SelectorBuilder};
use pinote::selector::parser::parse_selector;

use crate::common::fixtures::{el, shop_page, skeleton, text_el, toolbar};

mod common;

fn generate(doc: &Document, node: NodeId) -> String {
    SelectorBuilder::new(doc).generate(node)
}

// ============================================================================
// Uniqueness primitive
// ============================================================================

#[test]
fn unique_requires_single_match_on_the_target() {
    let page = shop_page();
    let doc = &page.doc;

    assert!(is_unique(doc, "#top", page.header));
    assert!(!is_unique(doc, "#top", page.nav), "single match but wrong element");
    assert!(!is_unique(doc, "a.link", page.home_link), "two links match");
    assert!(!is_unique(doc, "section.missing", page.featured));
}

#[test]
fn invalid_selector_is_never_unique() {
    let page = shop_page();
    assert!(!is_unique(&page.doc, "button[", page.featured_buy));
    assert!(!is_unique(&page.doc, ")))", page.featured_buy));
    assert!(count_matches(&page.doc, "button[").is_err());
}

#[test]
fn query_all_returns_document_order() {
    let page = shop_page();
    let found = page.doc.query_all("button.cta").unwrap();
    assert_eq!(found, vec![page.featured_buy, page.other_buy]);
    assert_eq!(page.doc.query_first("h2").unwrap(), Some(page.featured_title));
    assert_eq!(page.doc.query_first("table").unwrap(), None);
}

// ============================================================================
// Priority chain
// ============================================================================

#[test]
fn root_and_body_collapse_to_root_marker() {
    let page = shop_page();
    assert_eq!(generate(&page.doc, page.html), ROOT_SELECTOR);
    assert_eq!(generate(&page.doc, page.body), "body");
}

#[test]
fn non_element_collapses_to_root_marker() {
    let (mut doc, body) = skeleton();
    let p = doc.append_element(body, el("p"));
    let text = doc.append_text(p, "hello");
    assert_eq!(generate(&doc, text), "body");
}

#[test]
fn unique_id_wins() {
    let page = shop_page();
    assert_eq!(generate(&page.doc, page.header), "#top");

    let mut bar = toolbar();
    bar.doc.element_mut(bar.buy).unwrap().set_attr("id", "buy-btn");
    assert_eq!(generate(&bar.doc, bar.buy), "#buy-btn");
}

#[test]
fn unsafe_ids_are_skipped() {
    let (mut doc, body) = skeleton();
    let digit = doc.append_element(body, el("div").with_id("1abc").with_class("box"));
    let colon = doc.append_element(body, el("div").with_id("a:b").with_class("panel"));

    assert_eq!(generate(&doc, digit), "div.box");
    assert_eq!(generate(&doc, colon), "div.panel");
}

#[test]
fn duplicate_id_is_not_used_alone() {
    let (mut doc, body) = skeleton();
    let first = doc.append_element(body, el("section").with_id("dup"));
    let first_em = doc.append_element(first, el("em"));
    let second = doc.append_element(body, el("section").with_id("dup"));
    doc.append_element(second, el("em"));

    // The id segment ends the ancestor walk even though it is ambiguous.
    assert_eq!(generate(&doc, first_em), "#dup > em:nth-child(1)");
}

#[test]
fn single_class_qualified_by_tag() {
    let page = shop_page();
    assert_eq!(generate(&page.doc, page.nav), "nav.menu");
    assert_eq!(generate(&page.doc, page.featured_buy), "button.primary");
    assert_eq!(generate(&page.doc, page.other_buy), "button.secondary");
}

#[test]
fn class_pair_when_no_single_class_is_unique() {
    let bar = toolbar();
    assert_eq!(generate(&bar.doc, bar.buy), "button.cta.primary");
    assert_eq!(generate(&bar.doc, bar.cancel), "button.ghost");
}

#[test]
fn pairs_only_come_from_the_first_three_classes() {
    let (mut doc, body) = skeleton();
    let target = doc.append_element(body, el("span").with_class("a b c d"));
    doc.append_element(body, el("span").with_class("a b c"));
    doc.append_element(body, el("span").with_class("d"));

    // `a.d` would be unique but `d` is outside the pair window
    assert_eq!(generate(&doc, target), "span.a");
}

#[test]
fn unsafe_classes_are_ignored() {
    let (mut doc, body) = skeleton();
    let target = doc.append_element(body, el("div").with_class("md:w-1/2 card"));
    doc.append_element(body, el("div").with_class("md:w-1/2"));
    assert_eq!(generate(&doc, target), "div.card");
}

#[test]
fn data_attribute_in_source_order() {
    let (mut doc, body) = skeleton();
    let list = doc.append_element(body, el("ul"));
    let first = doc.append_element(
        list,
        el("li")
            .with_attr("data-kind", "item")
            .with_attr("data-sku", "A-1"),
    );
    let second = doc.append_element(
        list,
        el("li")
            .with_attr("data-pinote-highlight", "1")
            .with_attr("data-kind", "item")
            .with_attr("data-sku", "B-2"),
    );
    let quoted = doc.append_element(
        list,
        el("li")
            .with_attr("data-kind", "item")
            .with_attr("data-label", "say \"hi\""),
    );

    assert_eq!(generate(&doc, first), r#"li[data-sku="A-1"]"#);
    assert_eq!(
        generate(&doc, second),
        r#"li[data-sku="B-2"]"#,
        "reserved data attributes are never candidates"
    );

    let selector = generate(&doc, quoted);
    assert_eq!(selector, r#"li[data-label="say \"hi\""]"#);
    assert_eq!(doc.query_all(&selector).unwrap(), vec![quoted]);
}

#[test]
fn only_first_five_data_attributes_are_tried() {
    let (mut doc, body) = skeleton();
    let shared = |value: &str| {
        el("div")
            .with_attr("data-a", "x")
            .with_attr("data-b", "x")
            .with_attr("data-c", "x")
            .with_attr("data-d", "x")
            .with_attr("data-e", "x")
            .with_attr("data-f", value)
    };
    doc.append_element(body, shared("1"));
    let target = doc.append_element(body, shared("2"));

    assert_eq!(generate(&doc, target), "div:nth-child(2)");
}

#[test]
fn parent_scoped_with_class_then_tag() {
    let page = shop_page();
    assert_eq!(
        generate(&page.doc, page.featured_title),
        "section.featured > h2.title"
    );
    assert_eq!(generate(&page.doc, page.featured_desc), "section.featured > p");
}

#[test]
fn parent_scope_is_skipped_under_body() {
    let page = shop_page();
    // footer sits directly under body and has no id, class or data attribute
    assert_eq!(generate(&page.doc, page.footer), "footer:nth-child(3)");
}

#[test]
fn ancestor_path_uses_nth_child_and_stops_at_id() {
    let (mut doc, body) = skeleton();
    let mut spans = Vec::new();
    for list_id in ["todo", "done"] {
        let list = doc.append_element(body, el("ul").with_id(list_id));
        for label in ["a", "b"] {
            let item = doc.append_element(list, el("li"));
            spans.push(text_el(&mut doc, item, el("span"), label));
        }
    }

    assert_eq!(
        generate(&doc, spans[1]),
        "#todo > li:nth-child(2) > span:nth-child(1)"
    );
    assert_eq!(
        generate(&doc, spans[2]),
        "#done > li:nth-child(1) > span:nth-child(1)"
    );
}

#[test]
fn ancestor_path_stops_once_unique() {
    let page = shop_page();
    assert_eq!(generate(&page.doc, page.copyright), "p:nth-child(1)");
    assert_eq!(
        generate(&page.doc, page.terms),
        "footer:nth-child(3) > p:nth-child(2)"
    );
}

#[test]
fn ambiguous_element_gets_best_effort_path() {
    let page = shop_page();
    let selector = generate(&page.doc, page.other_title);
    assert_eq!(selector, "main.content > section.product > h2.title");
    assert_eq!(count_matches(&page.doc, &selector).unwrap(), 2);

    assert_eq!(generate(&page.doc, page.shop_link), "#top > nav.menu > a.link");
}

#[test]
fn every_generated_selector_parses() {
    let page = shop_page();
    for node in page.doc.elements() {
        let selector = generate(&page.doc, node);
        assert!(!selector.is_empty());
        assert!(
            parse_selector(&selector).is_ok(),
            "generated selector does not parse: {selector}"
        );
    }
}

#[test]
fn injected_ui_does_not_affect_uniqueness() {
    let (mut doc, body) = skeleton();
    let real = text_el(&mut doc, body, el("button").with_class("cta"), "Buy now");
    let host = doc.append_element(body, el("pinote-host"));
    text_el(&mut doc, host, el("button").with_class("cta"), "Save");
    let popover = doc.append_element(body, el("div").with_attr("data-pinote-ui", "popover"));
    text_el(&mut doc, popover, el("button").with_class("cta"), "Cancel");

    assert_eq!(generate(&doc, real), "button.cta");
}

// ============================================================================
// Structural path
// ============================================================================

#[test]
fn full_path_shows_classes_and_disambiguates_same_tag_siblings() {
    let page = shop_page();
    let builder = SelectorBuilder::new(&page.doc);

    assert_eq!(
        builder.full_path(page.featured_buy),
        "html > body > main.content > section.product.featured > button.cta.primary"
    );
    assert_eq!(
        builder.full_path(page.featured_desc),
        "html > body > main.content > section.product.featured > p"
    );
    assert_eq!(
        builder.full_path(page.terms),
        "html > body > footer > p:nth-child(2)"
    );
    assert_eq!(builder.full_path(page.html), "html");
}

#[test]
fn full_path_shows_at_most_two_classes() {
    let (mut doc, body) = skeleton();
    let node = doc.append_element(body, el("div").with_class("one two three"));
    assert_eq!(
        SelectorBuilder::new(&doc).full_path(node),
        "html > body > div.one.two"
    );
}
