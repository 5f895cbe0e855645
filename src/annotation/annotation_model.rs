use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchor::anchor_model::Anchor;
use crate::anchor::normalize::text_fingerprint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("comment is empty")]
    EmptyComment,
}

/// A user comment attached to one element.
///
/// The anchor is captured once at creation; editing the comment never
/// re-anchors, so drifting pages degrade resolution instead of silently
/// changing what the comment refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,

    #[serde(flatten)]
    pub anchor: Anchor,

    pub comment: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Opaque style snapshot; never read by matching.
    #[serde(default, alias = "computedStyles")]
    pub styles: BTreeMap<String, String>,
}

impl Annotation {
    pub fn create(
        anchor: Anchor,
        comment: &str,
        styles: BTreeMap<String, String>,
    ) -> Result<Self, AnnotationError> {
        Self::create_at(anchor, comment, styles, Utc::now())
    }

    pub fn create_at(
        anchor: Anchor,
        comment: &str,
        styles: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<Self, AnnotationError> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AnnotationError::EmptyComment);
        }

        Ok(Self {
            id: generate_id(&anchor, comment, now),
            anchor,
            comment: comment.to_string(),
            created_at: now,
            updated_at: now,
            styles,
        })
    }

    pub fn update_comment(&mut self, comment: &str) -> Result<(), AnnotationError> {
        self.update_comment_at(comment, Utc::now())
    }

    /// Replace the comment text in place. Id, anchor and creation time are kept.
    pub fn update_comment_at(&mut self, comment: &str, now: DateTime<Utc>) -> Result<(), AnnotationError> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AnnotationError::EmptyComment);
        }
        self.comment = comment.to_string();
        self.updated_at = now;
        Ok(())
    }
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// `ann_<base36 millis>_<5 hex>`: opaque, generated once per annotation.
fn generate_id(anchor: &Anchor, comment: &str, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u64;
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let seed = format!(
        "{}|{}|{}|{}",
        anchor.selector,
        comment,
        now.timestamp_nanos_opt().unwrap_or_default(),
        seq
    );
    let hash = text_fingerprint(&seed);
    format!("ann_{}_{}", to_base36(millis), &hash[..5])
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
