use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{NodeId, Rect};

/// Viewport-relative geometry at capture time, rounded to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BoundingBox {
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            x: rect.x.round() as i64,
            y: rect.y.round() as i64,
            width: rect.width.round() as i64,
            height: rect.height.round() as i64,
        }
    }
}

/// Structural and content fingerprint of an element, captured once when a
/// comment is attached and never regenerated afterwards.
///
/// Field names follow the stored record layout; the older names
/// (`elementPath`, `textContent`, `classes`) are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub selector: String,

    /// Display only; never used for re-matching.
    #[serde(default, alias = "elementPath")]
    pub structural_path: String,

    #[serde(default)]
    pub tag_name: String,

    #[serde(default, alias = "textContent")]
    pub text_snippet: String,

    /// Order matters: class matching tries tokens in this order.
    #[serde(default, alias = "classes")]
    pub class_list: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Strategy tier at which an anchor was re-acquired, most precise first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    Exact,
    TextMatch,
    TextPartial,
    ClassMatch,
    Position,
    Orphaned,
}

impl Confidence {
    pub const ALL: [Confidence; 6] = [
        Confidence::Exact,
        Confidence::TextMatch,
        Confidence::TextPartial,
        Confidence::ClassMatch,
        Confidence::Position,
        Confidence::Orphaned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Exact => "exact",
            Confidence::TextMatch => "text-match",
            Confidence::TextPartial => "text-partial",
            Confidence::ClassMatch => "class-match",
            Confidence::Position => "position",
            Confidence::Orphaned => "orphaned",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Confidence::Orphaned)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving an anchor against the live document.
/// `element` is `None` exactly when the confidence is `Orphaned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub element: Option<NodeId>,
    pub confidence: Confidence,
}

impl Resolution {
    pub fn found(element: NodeId, confidence: Confidence) -> Self {
        Self {
            element: Some(element),
            confidence,
        }
    }

    pub fn orphaned() -> Self {
        Self {
            element: None,
            confidence: Confidence::Orphaned,
        }
    }
}
