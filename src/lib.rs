use std::collections::BTreeMap;

use crate::{
    anchor::capture::{CaptureConfig, capture_anchor},
    annotation::{
        annotation_model::{Annotation, AnnotationError},
        styles::normalize_style_snapshot,
    },
    dom::{dom_model::NodeId, query::DomQuery},
};

pub mod anchor;
pub mod annotation;
pub mod cli;
pub mod dom;
pub mod report;
pub mod selector;

/// Attach `comment` to `node`: capture its anchor and style snapshot and
/// create the annotation record. Blank comments are rejected.
pub fn annotate<D: DomQuery + ?Sized>(
    dom: &D,
    node: NodeId,
    comment: &str,
    config: &CaptureConfig,
) -> Result<Annotation, AnnotationError> {
    let anchor = capture_anchor(dom, node, config);
    let styles = dom
        .element(node)
        .map(|el| normalize_style_snapshot(&el.style))
        .unwrap_or_else(BTreeMap::new);

    Annotation::create(anchor, comment, styles)
}
