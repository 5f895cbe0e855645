use serde::{Deserialize, Serialize};

use crate::anchor::anchor_model::{Anchor, BoundingBox};
use crate::anchor::normalize::text_snippet;
use crate::dom::dom_model::NodeId;
use crate::dom::query::DomQuery;
use crate::selector::builder::SelectorBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Maximum stored text snippet length, in characters.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
        }
    }
}

fn default_max_text_chars() -> usize {
    200
}

/// Fingerprint `node` as it is right now.
pub fn capture_anchor<D: DomQuery + ?Sized>(dom: &D, node: NodeId, config: &CaptureConfig) -> Anchor {
    let builder = SelectorBuilder::new(dom);
    let selector = builder.generate(node);
    let structural_path = builder.full_path(node);

    let Some(el) = dom.element(node) else {
        return Anchor {
            selector,
            structural_path,
            ..Anchor::default()
        };
    };

    let anchor = Anchor {
        selector,
        structural_path,
        tag_name: el.tag.clone(),
        text_snippet: text_snippet(&dom.text_content(node), config.max_text_chars),
        class_list: el.classes().into_iter().map(str::to_string).collect(),
        bounding_box: Some(BoundingBox::from_rect(&el.rect)),
    };

    tracing::debug!(
        selector = %anchor.selector,
        tag = %anchor.tag_name,
        "captured anchor"
    );
    anchor
}
