use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::anchor::anchor_model::{Anchor, Confidence, Resolution};
use crate::anchor::normalize::{normalize_match_text, truncate_chars};
use crate::dom::query::DomQuery;
use crate::selector::escape::escape_identifier;

/// Tunables for the fuzzy strategies. The defaults are the historical
/// values; none of them is derived from anything deeper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum |dx| and |dy| (exclusive) for a position candidate.
    #[serde(default = "default_position_tolerance_px")]
    pub position_tolerance_px: f64,

    /// Prefix length used by the partial text match.
    #[serde(default = "default_partial_prefix_chars")]
    pub partial_prefix_chars: usize,

    /// Partial text matching only applies to snippets longer than this.
    #[serde(default = "default_partial_min_chars")]
    pub partial_min_chars: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            position_tolerance_px: default_position_tolerance_px(),
            partial_prefix_chars: default_partial_prefix_chars(),
            partial_min_chars: default_partial_min_chars(),
        }
    }
}

fn default_position_tolerance_px() -> f64 {
    50.0
}

fn default_partial_prefix_chars() -> usize {
    50
}

fn default_partial_min_chars() -> usize {
    10
}

/// Re-locates the live element for a stored anchor.
///
/// Strategies run strictly in order and the first hit wins:
/// exact selector replay, text + tag, class, position. When none of them
/// matches, the anchor is orphaned. Nothing here returns an error.
pub struct AnchorResolver<'a, D: DomQuery + ?Sized> {
    dom: &'a D,
    config: ResolverConfig,
}

impl<'a, D: DomQuery + ?Sized> AnchorResolver<'a, D> {
    pub fn new(dom: &'a D) -> Self {
        Self::with_config(dom, ResolverConfig::default())
    }

    pub fn with_config(dom: &'a D, config: ResolverConfig) -> Self {
        Self { dom, config }
    }

    /// The strategy chain, in priority order.
    pub fn strategies() -> [(&'static str, fn(&Self, &Anchor) -> Option<Resolution>); 4] {
        [
            ("exact-replay", Self::exact_replay),
            ("text-and-tag", Self::text_and_tag),
            ("class-match", Self::class_match),
            ("position-match", Self::position_match),
        ]
    }

    pub fn find_element(&self, anchor: &Anchor) -> Resolution {
        for (name, strategy) in Self::strategies() {
            if let Some(resolution) = strategy(self, anchor) {
                debug!(
                    strategy = name,
                    confidence = %resolution.confidence,
                    selector = %anchor.selector,
                    "anchor resolved"
                );
                return resolution;
            }
            trace!(strategy = name, selector = %anchor.selector, "strategy found nothing");
        }

        debug!(selector = %anchor.selector, "anchor orphaned");
        Resolution::orphaned()
    }

    /// Replay the stored selector verbatim; first match in document order.
    pub fn exact_replay(&self, anchor: &Anchor) -> Option<Resolution> {
        match self.dom.query_first(&anchor.selector) {
            Ok(found) => found.map(|node| Resolution::found(node, Confidence::Exact)),
            Err(e) => {
                trace!(selector = %anchor.selector, error = %e, "stored selector is invalid");
                None
            }
        }
    }

    /// First element of the stored tag whose text equals the snippet; failing
    /// that, the first whose text starts with the snippet's prefix.
    pub fn text_and_tag(&self, anchor: &Anchor) -> Option<Resolution> {
        if anchor.tag_name.is_empty() {
            return None;
        }
        let target = normalize_match_text(&anchor.text_snippet);
        if target.is_empty() {
            return None;
        }

        let candidates: Vec<_> = self
            .dom
            .elements_by_tag(Some(&anchor.tag_name))
            .into_iter()
            .map(|node| (node, normalize_match_text(&self.dom.text_content(node))))
            .collect();

        if let Some((node, _)) = candidates.iter().find(|(_, text)| *text == target) {
            return Some(Resolution::found(*node, Confidence::TextMatch));
        }

        if target.chars().count() <= self.config.partial_min_chars {
            return None;
        }
        let prefix = truncate_chars(&target, self.config.partial_prefix_chars);
        candidates
            .iter()
            .find(|(_, text)| text.starts_with(prefix))
            .map(|(node, _)| Resolution::found(*node, Confidence::TextPartial))
    }

    /// First stored class that, qualified by the tag, selects exactly one element.
    pub fn class_match(&self, anchor: &Anchor) -> Option<Resolution> {
        for class in &anchor.class_list {
            let selector = format!("{}.{}", anchor.tag_name, escape_identifier(class));
            match self.dom.query_all(&selector) {
                Ok(found) if found.len() == 1 => {
                    return Some(Resolution::found(found[0], Confidence::ClassMatch));
                }
                Ok(found) => {
                    trace!(%selector, matches = found.len(), "class candidate not singular");
                }
                Err(e) => {
                    trace!(%selector, error = %e, "class candidate invalid");
                }
            }
        }
        None
    }

    /// Closest element by geometry among those within tolerance on both axes.
    /// Ties keep the earliest candidate in document order.
    pub fn position_match(&self, anchor: &Anchor) -> Option<Resolution> {
        let stored = anchor.bounding_box?;
        let tag = (!anchor.tag_name.is_empty()).then_some(anchor.tag_name.as_str());
        let tolerance = self.config.position_tolerance_px;

        let mut best: Option<(f64, _)> = None;
        for node in self.dom.elements_by_tag(tag) {
            let Some(el) = self.dom.element(node) else {
                continue;
            };
            let rect = el.rect;
            let dx = (rect.x - stored.x as f64).abs();
            let dy = (rect.y - stored.y as f64).abs();
            if dx >= tolerance || dy >= tolerance {
                continue;
            }

            let dw = (rect.width - stored.width as f64).abs();
            let dh = (rect.height - stored.height as f64).abs();
            let distance = dx + dy + 0.5 * dw + 0.5 * dh;

            if best.map(|(d, _)| distance < d).unwrap_or(true) {
                best = Some((distance, node));
            }
        }

        best.map(|(_, node)| Resolution::found(node, Confidence::Position))
    }
}
