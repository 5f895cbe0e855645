use tracing::debug;

use crate::dom::dom_model::{NodeId, RESERVED_DATA_PREFIX};
use crate::dom::query::{DomQuery, is_unique};
use crate::selector::escape::{escape_attribute_value, escape_identifier, is_safe_identifier};

/// Selector emitted for the document element and `body`.
pub const ROOT_SELECTOR: &str = "body";

/// Separator used both between path segments and for the child combinator.
pub const PATH_SEPARATOR: &str = " > ";

const MAX_DATA_ATTRIBUTES: usize = 5;

/// Class pairs are drawn from this many leading class tokens.
const PAIR_WINDOW: usize = 3;

/// Builds a compact selector for an element at the moment it is annotated.
///
/// Candidates are tried in priority order and each one is validated with the
/// uniqueness primitive before it is accepted:
///
/// 1. `#id` (safe identifiers only)
/// 2. `tag.class` for each class
/// 3. `tag.classA.classB` for pairs among the first three classes
/// 4. `.class` without the tag
/// 5. `tag[data-*="value"]` for the first five data attributes
/// 6. `<parent> > tag.class`, then `<parent> > tag`
/// 7. ancestor path of id / `tag.class` / `tag:nth-child(n)` segments
/// 8. the bare tag
pub struct SelectorBuilder<'a, D: DomQuery + ?Sized> {
    dom: &'a D,
}

impl<'a, D: DomQuery + ?Sized> SelectorBuilder<'a, D> {
    pub fn new(dom: &'a D) -> Self {
        Self { dom }
    }

    /// Always returns a usable, non-empty selector.
    pub fn generate(&self, node: NodeId) -> String {
        let Some(el) = self.dom.element(node) else {
            return ROOT_SELECTOR.to_string();
        };
        if self.dom.is_root(node) {
            return ROOT_SELECTOR.to_string();
        }

        let candidates: [(&str, fn(&Self, NodeId) -> Option<String>); 5] = [
            ("id", Self::id_selector),
            ("class", Self::class_selector),
            ("data-attribute", Self::data_attribute_selector),
            ("parent-scoped", Self::parent_scoped_selector),
            ("ancestor-path", Self::ancestor_path_selector),
        ];

        for (kind, candidate) in candidates {
            if let Some(selector) = candidate(self, node) {
                debug!(kind, %selector, "generated selector");
                return selector;
            }
        }

        debug!(tag = %el.tag, "falling back to bare tag selector");
        el.tag.clone()
    }

    pub fn id_selector(&self, node: NodeId) -> Option<String> {
        let id = self.dom.element(node)?.id()?;
        if !is_safe_identifier(id) {
            return None;
        }
        let selector = format!("#{}", escape_identifier(id));
        is_unique(self.dom, &selector, node).then_some(selector)
    }

    /// Steps 2 to 4: single class, class pair, then class without tag.
    pub fn class_selector(&self, node: NodeId) -> Option<String> {
        let el = self.dom.element(node)?;
        let tag = &el.tag;
        let classes = safe_classes(el.classes());

        for class in &classes {
            let selector = format!("{tag}.{}", escape_identifier(class));
            if is_unique(self.dom, &selector, node) {
                return Some(selector);
            }
        }

        let window = &classes[..classes.len().min(PAIR_WINDOW)];
        for (i, first) in window.iter().enumerate() {
            for second in &window[i + 1..] {
                let selector = format!(
                    "{tag}.{}.{}",
                    escape_identifier(first),
                    escape_identifier(second)
                );
                if is_unique(self.dom, &selector, node) {
                    return Some(selector);
                }
            }
        }

        classes
            .iter()
            .map(|class| format!(".{}", escape_identifier(class)))
            .find(|selector| is_unique(self.dom, selector, node))
    }

    pub fn data_attribute_selector(&self, node: NodeId) -> Option<String> {
        let el = self.dom.element(node)?;
        el.attributes
            .iter()
            .filter(|a| {
                a.name.starts_with("data-")
                    && !a.name.starts_with(RESERVED_DATA_PREFIX)
                    && !a.value.is_empty()
            })
            .take(MAX_DATA_ATTRIBUTES)
            .map(|a| {
                format!(
                    "{}[{}=\"{}\"]",
                    el.tag,
                    a.name,
                    escape_attribute_value(&a.value)
                )
            })
            .find(|selector| is_unique(self.dom, selector, node))
    }

    pub fn parent_scoped_selector(&self, node: NodeId) -> Option<String> {
        let el = self.dom.element(node)?;
        let parent = self.dom.parent(node)?;
        if self.dom.is_root(parent) {
            return None;
        }

        let parent_selector = self
            .id_selector(parent)
            .or_else(|| self.class_selector(parent))?;

        let tag = &el.tag;
        for class in safe_classes(el.classes()) {
            let selector = format!(
                "{parent_selector}{PATH_SEPARATOR}{tag}.{}",
                escape_identifier(class)
            );
            if is_unique(self.dom, &selector, node) {
                return Some(selector);
            }
        }

        let selector = format!("{parent_selector}{PATH_SEPARATOR}{tag}");
        is_unique(self.dom, &selector, node).then_some(selector)
    }

    /// Walk towards the root, prepending one segment per level until the
    /// accumulated path is unique. An id segment ends the walk.
    pub fn ancestor_path_selector(&self, node: NodeId) -> Option<String> {
        let mut segments: Vec<String> = Vec::new();
        let mut current = node;

        while !self.dom.is_root(current) {
            let Some(parent) = self.dom.parent(current) else {
                break;
            };
            let Some(el) = self.dom.element(current) else {
                break;
            };

            if let Some(id) = el.id().filter(|id| is_safe_identifier(id)) {
                segments.insert(0, format!("#{}", escape_identifier(id)));
                let selector = segments.join(PATH_SEPARATOR);
                if is_unique(self.dom, &selector, node) {
                    return Some(selector);
                }
                break;
            }

            let segment = match safe_classes(el.classes()).first() {
                Some(class) => format!("{}.{}", el.tag, escape_identifier(class)),
                None => {
                    let index = self.dom.element_index(current)?;
                    format!("{}:nth-child({index})", el.tag)
                }
            };
            segments.insert(0, segment);

            let selector = segments.join(PATH_SEPARATOR);
            if is_unique(self.dom, &selector, node) {
                return Some(selector);
            }

            current = parent;
        }

        (!segments.is_empty()).then(|| segments.join(PATH_SEPARATOR))
    }

    /// Human-readable path from the document element down to `node`.
    /// Display only; never replayed.
    pub fn full_path(&self, node: NodeId) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut current = Some(node);

        while let Some(n) = current {
            let Some(el) = self.dom.element(n) else {
                break;
            };

            let classes = safe_classes(el.classes());
            let mut segment = el.tag.clone();
            if !classes.is_empty() {
                let shown: Vec<&str> = classes.iter().take(2).copied().collect();
                segment.push('.');
                segment.push_str(&shown.join("."));
            } else if let Some(parent) = self.dom.parent(n) {
                let same_tag = self
                    .dom
                    .element_children(parent)
                    .into_iter()
                    .filter(|c| self.dom.element(*c).map(|e| e.tag == el.tag).unwrap_or(false))
                    .count();
                if same_tag > 1 {
                    if let Some(index) = self.dom.element_index(n) {
                        segment.push_str(&format!(":nth-child({index})"));
                    }
                }
            }

            parts.insert(0, segment);
            current = self.dom.parent(n);
        }

        parts.join(PATH_SEPARATOR)
    }
}

fn safe_classes(classes: Vec<&str>) -> Vec<&str> {
    classes.into_iter().filter(|c| is_safe_identifier(c)).collect()
}
