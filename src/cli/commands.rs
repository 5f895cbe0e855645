use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::anchor::capture::capture_anchor;
use crate::anchor::resolver::ResolverConfig;
use crate::annotation::annotation_model::{Annotation, AnnotationError};
use crate::annotation::resolution::resolve_all;
use crate::cli::config::AppConfig;
use crate::dom::dom_model::{Document, NodeId};
use crate::dom::query::DomQuery;
use crate::dom::snapshot::SnapshotError;
use crate::report::console::format_console_report;
use crate::selector::builder::SelectorBuilder;
use crate::selector::selector_model::SelectorError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("invalid target selector {selector:?}: {source}")]
    TargetSelector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("no element matches target selector {0:?}")]
    TargetNotFound(String),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown output format {0:?} (expected console or json)")]
    UnknownFormat(String),
}

/// Stored annotations: either a bare list or a per-page record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnnotationsFile {
    List(Vec<Annotation>),
    Page {
        #[serde(rename = "pageTitle", default)]
        page_title: String,
        annotations: Vec<Annotation>,
    },
}

impl AnnotationsFile {
    pub fn page_title(&self) -> Option<&str> {
        match self {
            AnnotationsFile::Page { page_title, .. } if !page_title.is_empty() => Some(page_title.as_str()),
            _ => None,
        }
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        match self {
            AnnotationsFile::List(list) => list,
            AnnotationsFile::Page { annotations, .. } => annotations,
        }
    }
}

pub fn parse_annotations(json: &str) -> Result<Vec<Annotation>, serde_json::Error> {
    let file: AnnotationsFile = serde_json::from_str(json)?;
    Ok(file.into_annotations())
}

fn load_annotations(path: &str) -> Result<AnnotationsFile, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn find_target(doc: &Document, target: &str) -> Result<NodeId, CliError> {
    doc.query_first(target)
        .map_err(|source| CliError::TargetSelector {
            selector: target.to_string(),
            source,
        })?
        .ok_or_else(|| CliError::TargetNotFound(target.to_string()))
}

// ============================================================================
// anchor subcommand
// ============================================================================

/// Capture the target's anchor (or a full annotation when a comment is
/// given) and render it as JSON.
pub fn cmd_anchor(
    snapshot: &str,
    target: &str,
    comment: Option<&str>,
    config: &AppConfig,
) -> Result<String, CliError> {
    let doc = Document::load(Path::new(snapshot))?;
    let node = find_target(&doc, target)?;

    let json = match comment {
        Some(comment) => {
            let annotation = crate::annotate(&doc, node, comment, &config.capture)?;
            tracing::info!(id = %annotation.id, selector = %annotation.anchor.selector, "created annotation");
            serde_json::to_string_pretty(&annotation)?
        }
        None => serde_json::to_string_pretty(&capture_anchor(&doc, node, &config.capture))?,
    };
    Ok(json)
}

// ============================================================================
// resolve subcommand
// ============================================================================

/// Resolve stored annotations and render the report.
pub fn cmd_resolve(
    snapshot: &str,
    annotations: &str,
    format: &str,
    resolver: &ResolverConfig,
) -> Result<String, CliError> {
    if !matches!(format, "console" | "json") {
        return Err(CliError::UnknownFormat(format.to_string()));
    }

    let doc = Document::load(Path::new(snapshot))?;
    let file = load_annotations(annotations)?;
    let page = doc
        .url
        .clone()
        .or_else(|| file.page_title().map(str::to_string))
        .unwrap_or_else(|| snapshot.to_string());
    let report = resolve_all(&doc, &file.into_annotations(), resolver);

    match format {
        "json" => Ok(serde_json::to_string_pretty(&report)?),
        _ => Ok(format_console_report(&page, &report)),
    }
}

// ============================================================================
// path subcommand
// ============================================================================

pub fn cmd_path(snapshot: &str, target: &str) -> Result<String, CliError> {
    let doc = Document::load(Path::new(snapshot))?;
    let node = find_target(&doc, target)?;
    Ok(SelectorBuilder::new(&doc).full_path(node))
}

/// Write to a file, or print to stdout when no path is given.
pub fn write_output(content: &str, output: Option<&str>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|source| CliError::Write {
                path: path.to_string(),
                source,
            })?;
            eprintln!("Output written to: {}", path);
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}
