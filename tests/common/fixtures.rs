use pinote::dom::dom_model::{Document, ElementData, NodeId};

pub fn el(tag: &str) -> ElementData {
    ElementData::new(tag)
}

/// `<html><body></body></html>`, returning the document and `body`.
pub fn skeleton() -> (Document, NodeId) {
    let mut doc = Document::new(el("html").with_rect(0.0, 0.0, 1200.0, 1000.0));
    let root = doc.root();
    let body = doc.append_element(root, el("body").with_rect(0.0, 0.0, 1200.0, 1000.0));
    (doc, body)
}

pub fn text_el(doc: &mut Document, parent: NodeId, data: ElementData, text: &str) -> NodeId {
    let id = doc.append_element(parent, data);
    doc.append_text(id, text);
    id
}

/// Small storefront page:
///
/// ```text
/// body
///   header#top.site-header
///     nav.menu > a.link "Home", a.link "Shop"
///   main.content
///     section.product.featured[data-product-id=42]
///       h2.title "Blue Mug", p "...", button.cta.primary "Buy now"
///     section.product[data-product-id=43]
///       h2.title "Red Mug", button.cta.secondary "Add to cart"
///   footer
///     p "(c) 2026 Mug Shop", p "Terms"
/// ```
pub struct ShopPage {
    pub doc: Document,
    pub html: NodeId,
    pub body: NodeId,
    pub header: NodeId,
    pub nav: NodeId,
    pub home_link: NodeId,
    pub shop_link: NodeId,
    pub main: NodeId,
    pub featured: NodeId,
    pub featured_title: NodeId,
    pub featured_desc: NodeId,
    pub featured_buy: NodeId,
    pub other: NodeId,
    pub other_title: NodeId,
    pub other_buy: NodeId,
    pub footer: NodeId,
    pub copyright: NodeId,
    pub terms: NodeId,
}

pub const FEATURED_DESCRIPTION: &str =
    "A very nice mug for your morning coffee, glazed by hand in small batches.";

pub fn shop_page() -> ShopPage {
    let (mut doc, body) = skeleton();
    let html = doc.root();

    let header = doc.append_element(
        body,
        el("header")
            .with_id("top")
            .with_class("site-header")
            .with_rect(0.0, 0.0, 1200.0, 80.0),
    );
    let nav = doc.append_element(
        header,
        el("nav").with_class("menu").with_rect(20.0, 20.0, 400.0, 40.0),
    );
    let home_link = text_el(
        &mut doc,
        nav,
        el("a").with_class("link").with_rect(20.0, 20.0, 60.0, 40.0),
        "Home",
    );
    let shop_link = text_el(
        &mut doc,
        nav,
        el("a").with_class("link").with_rect(90.0, 20.0, 60.0, 40.0),
        "Shop",
    );

    let main = doc.append_element(
        body,
        el("main").with_class("content").with_rect(0.0, 80.0, 1200.0, 800.0),
    );
    let featured = doc.append_element(
        main,
        el("section")
            .with_class("product featured")
            .with_attr("data-product-id", "42")
            .with_rect(0.0, 100.0, 600.0, 300.0),
    );
    let featured_title = text_el(
        &mut doc,
        featured,
        el("h2").with_class("title").with_rect(20.0, 110.0, 300.0, 40.0),
        "Blue Mug",
    );
    let featured_desc = text_el(
        &mut doc,
        featured,
        el("p").with_rect(20.0, 160.0, 500.0, 60.0),
        FEATURED_DESCRIPTION,
    );
    let featured_buy = text_el(
        &mut doc,
        featured,
        el("button")
            .with_class("cta primary")
            .with_rect(20.0, 240.0, 120.0, 40.0)
            .with_style("color", "rgb(255, 255, 255)")
            .with_style("backgroundColor", "rgba(37, 99, 235, 1)")
            .with_style("paddingTop", "8px")
            .with_style("paddingRight", "16px")
            .with_style("paddingBottom", "8px")
            .with_style("paddingLeft", "16px")
            .with_style("position", "static")
            .with_style("cursor", "pointer"),
        "Buy now",
    );

    let other = doc.append_element(
        main,
        el("section")
            .with_class("product")
            .with_attr("data-product-id", "43")
            .with_rect(600.0, 100.0, 600.0, 300.0),
    );
    let other_title = text_el(
        &mut doc,
        other,
        el("h2").with_class("title").with_rect(620.0, 110.0, 300.0, 40.0),
        "Red Mug",
    );
    let other_buy = text_el(
        &mut doc,
        other,
        el("button")
            .with_class("cta secondary")
            .with_rect(620.0, 240.0, 120.0, 40.0),
        "Add to cart",
    );

    let footer = doc.append_element(body, el("footer").with_rect(0.0, 900.0, 1200.0, 100.0));
    let copyright = text_el(
        &mut doc,
        footer,
        el("p").with_rect(20.0, 920.0, 300.0, 20.0),
        "(c) 2026 Mug Shop",
    );
    let terms = text_el(
        &mut doc,
        footer,
        el("p").with_rect(20.0, 950.0, 300.0, 20.0),
        "Terms",
    );

    ShopPage {
        doc,
        html,
        body,
        header,
        nav,
        home_link,
        shop_link,
        main,
        featured,
        featured_title,
        featured_desc,
        featured_buy,
        other,
        other_title,
        other_buy,
        footer,
        copyright,
        terms,
    }
}

/// Toolbar where neither `cta` nor `primary` alone singles out the buy button.
pub struct Toolbar {
    pub doc: Document,
    pub buy: NodeId,
    pub details: NodeId,
    pub cancel: NodeId,
}

pub fn toolbar() -> Toolbar {
    let (mut doc, body) = skeleton();
    let bar = doc.append_element(body, el("div").with_class("toolbar"));
    let buy = text_el(
        &mut doc,
        bar,
        el("button")
            .with_class("cta primary")
            .with_rect(10.0, 10.0, 100.0, 30.0),
        "Buy now",
    );
    let details = text_el(
        &mut doc,
        bar,
        el("button").with_class("cta").with_rect(120.0, 10.0, 100.0, 30.0),
        "Details",
    );
    let cancel = text_el(
        &mut doc,
        bar,
        el("button")
            .with_class("ghost primary")
            .with_rect(230.0, 10.0, 100.0, 30.0),
        "Cancel",
    );
    Toolbar {
        doc,
        buy,
        details,
        cancel,
    }
}

/// Same page as JSON, in the browser extractor's snapshot format.
pub const SHOP_SNAPSHOT_JSON: &str = r#"{
  "url": "https://shop.example/mugs",
  "title": "Mugs",
  "root": { "tag": "html", "children": [
    { "tag": "body", "children": [
      { "tag": "main", "attributes": [{ "name": "class", "value": "content" }], "children": [
        { "tag": "h1", "attributes": [{ "name": "id", "value": "headline" }], "children": ["Our mugs"] },
        { "tag": "button",
          "attributes": [{ "name": "class", "value": "cta primary" }],
          "rect": { "x": 10.4, "y": 20.6, "width": 120, "height": 32 },
          "style": { "color": "rgb(0, 0, 0)", "cursor": "pointer" },
          "children": ["Buy now"] },
        { "tag": "button",
          "attributes": [{ "name": "class", "value": "cta" }],
          "children": ["Details"] }
      ] },
      { "tag": "pinote-host", "children": [
        { "tag": "button", "attributes": [{ "name": "class", "value": "cta primary" }], "children": ["Buy now"] }
      ] }
    ] }
  ] }
}"#;
