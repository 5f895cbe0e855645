use std::collections::BTreeMap;

use serde::Serialize;

use crate::anchor::anchor_model::{Confidence, Resolution};
use crate::anchor::resolver::{AnchorResolver, ResolverConfig};
use crate::annotation::annotation_model::Annotation;
use crate::dom::query::DomQuery;
use crate::selector::builder::SelectorBuilder;

/// Resolution of one stored annotation against the current page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationResolution {
    pub annotation_id: String,
    pub comment: String,
    pub selector: String,
    #[serde(flatten)]
    pub resolution: Resolution,
    /// Structural path of the element found now, for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionReport {
    pub entries: Vec<AnnotationResolution>,
    pub counts: BTreeMap<Confidence, usize>,
}

impl ResolutionReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, confidence: Confidence) -> usize {
        self.counts.get(&confidence).copied().unwrap_or(0)
    }

    pub fn resolved(&self) -> usize {
        self.total() - self.count(Confidence::Orphaned)
    }

    pub fn orphaned(&self) -> impl Iterator<Item = &AnnotationResolution> {
        self.entries
            .iter()
            .filter(|e| e.resolution.confidence == Confidence::Orphaned)
    }

    pub fn all_resolved(&self) -> bool {
        self.count(Confidence::Orphaned) == 0
    }
}

/// Resolve every annotation of a page, in the given order.
pub fn resolve_all<D: DomQuery + ?Sized>(
    dom: &D,
    annotations: &[Annotation],
    config: &ResolverConfig,
) -> ResolutionReport {
    let resolver = AnchorResolver::with_config(dom, config.clone());
    let builder = SelectorBuilder::new(dom);
    let mut report = ResolutionReport::default();

    for annotation in annotations {
        let resolution = resolver.find_element(&annotation.anchor);
        *report.counts.entry(resolution.confidence).or_insert(0) += 1;
        report.entries.push(AnnotationResolution {
            annotation_id: annotation.id.clone(),
            comment: annotation.comment.clone(),
            selector: annotation.anchor.selector.clone(),
            resolution,
            element_path: resolution.element.map(|node| builder.full_path(node)),
        });
    }

    tracing::info!(
        total = report.total(),
        resolved = report.resolved(),
        orphaned = report.count(Confidence::Orphaned),
        "resolved page annotations"
    );
    report
}
