use crate::dom::dom_model::{Document, ElementData, NodeId};
use crate::selector::matcher::matches_list;
use crate::selector::parser::parse_selector;
use crate::selector::selector_model::SelectorError;

/// Read-only query capability over a live document.
///
/// Both the selector builder and the anchor resolver only ever talk to the
/// page through this trait, so they can run against a synthetic fixture tree
/// as easily as against a snapshot of a real page. Implementations must hide
/// the annotation tool's own injected subtree from `query_all` and
/// `elements_by_tag`.
pub trait DomQuery {
    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError>;

    /// All elements with the given tag (any tag when `None`), in document order.
    fn elements_by_tag(&self, tag: Option<&str>) -> Vec<NodeId>;

    fn element(&self, node: NodeId) -> Option<&ElementData>;

    /// Parent element, `None` at the document element.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn element_children(&self, node: NodeId) -> Vec<NodeId>;

    /// 1-based index among element siblings.
    fn element_index(&self, node: NodeId) -> Option<usize>;

    fn text_content(&self, node: NodeId) -> String;

    /// Document element or `body`.
    fn is_root(&self, node: NodeId) -> bool;

    fn query_first(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }
}

impl DomQuery for Document {
    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = parse_selector(selector)?;
        Ok(self
            .elements()
            .into_iter()
            .filter(|id| !self.is_excluded(*id) && matches_list(self, *id, &list))
            .collect())
    }

    fn elements_by_tag(&self, tag: Option<&str>) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|id| !self.is_excluded(*id))
            .filter(|id| match tag {
                Some(tag) => Document::element(self, *id)
                    .map(|e| e.tag.eq_ignore_ascii_case(tag))
                    .unwrap_or(false),
                None => true,
            })
            .collect()
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        Document::element(self, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_element(node)
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        Document::element_children(self, node)
    }

    fn element_index(&self, node: NodeId) -> Option<usize> {
        Document::element_index(self, node)
    }

    fn text_content(&self, node: NodeId) -> String {
        Document::text_content(self, node)
    }

    fn is_root(&self, node: NodeId) -> bool {
        Document::is_root(self, node)
    }
}

/// Number of live elements matching `selector`.
pub fn count_matches<D: DomQuery + ?Sized>(dom: &D, selector: &str) -> Result<usize, SelectorError> {
    Ok(dom.query_all(selector)?.len())
}

/// Uniqueness primitive: `selector` matches exactly one element and that
/// element is `target`. Invalid selectors are simply not unique.
pub fn is_unique<D: DomQuery + ?Sized>(dom: &D, selector: &str, target: NodeId) -> bool {
    match dom.query_all(selector) {
        Ok(found) => found.len() == 1 && found[0] == target,
        Err(e) => {
            tracing::trace!(selector, error = %e, "candidate selector rejected");
            false
        }
    }
}
