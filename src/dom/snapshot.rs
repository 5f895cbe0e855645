use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dom::dom_model::{Attribute, Document, ElementData, NodeId, Rect};

/// Serialized page as emitted by a browser-side extractor.
///
/// ```json
/// { "url": "https://example.com", "title": "Shop",
///   "root": { "tag": "html", "children": [
///     { "tag": "body", "children": [
///       { "tag": "button",
///         "attributes": [{ "name": "class", "value": "cta primary" }],
///         "rect": { "x": 10, "y": 20, "width": 120, "height": 32 },
///         "children": ["Buy now"] } ] } ] } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    pub root: SnapshotNode,
}

/// Text nodes are bare JSON strings; everything else is an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotNode {
    Text(String),
    Element(SnapshotElement),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot root must be an element, found a text node")]
    TextRoot,

    #[error("snapshot element has an empty tag name")]
    EmptyTag,
}

impl SnapshotElement {
    fn to_element_data(&self) -> Result<ElementData, SnapshotError> {
        if self.tag.trim().is_empty() {
            return Err(SnapshotError::EmptyTag);
        }
        let mut data = ElementData::new(self.tag.trim());
        for attr in &self.attributes {
            data.set_attr(&attr.name, &attr.value);
        }
        data.rect = self.rect.unwrap_or_default();
        data.style = self.style.clone();
        Ok(data)
    }
}

impl Document {
    pub fn from_snapshot(snapshot: &DomSnapshot) -> Result<Self, SnapshotError> {
        let root = match &snapshot.root {
            SnapshotNode::Element(el) => el,
            SnapshotNode::Text(_) => return Err(SnapshotError::TextRoot),
        };

        let mut doc = Document::new(root.to_element_data()?);
        doc.url = snapshot.url.clone();
        doc.title = snapshot.title.clone();

        let root_id = doc.root();
        append_children(&mut doc, root_id, &root.children)?;
        Ok(doc)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: DomSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), nodes = doc.len(), "loaded DOM snapshot");
        Ok(doc)
    }
}

fn append_children(
    doc: &mut Document,
    parent: NodeId,
    children: &[SnapshotNode],
) -> Result<(), SnapshotError> {
    for child in children {
        match child {
            SnapshotNode::Text(text) => {
                doc.append_text(parent, text.as_str());
            }
            SnapshotNode::Element(el) => {
                let id = doc.append_element(parent, el.to_element_data()?);
                append_children(doc, id, &el.children)?;
            }
        }
    }
    Ok(())
}
