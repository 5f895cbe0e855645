use crate::anchor::anchor_model::Confidence;
use crate::annotation::resolution::ResolutionReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

const COMMENT_PREVIEW_CHARS: usize = 48;

/// Format a resolution report for terminal output.
///
/// Produces output like:
/// ```text
/// === Annotations: https://shop.example/cart ===
///
/// ✓ exact         ann_lo1x2_3f9a1  "Make this button bigger"
///     html > body > main.cart > button.cta.primary
/// ✗ orphaned      ann_lo1x9_77c02  "Typo in the heading"
///     selector: h1.title
///
/// === Results: 1 resolved, 1 orphaned (2 total) ===
/// ```
pub fn format_console_report(page: &str, report: &ResolutionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Annotations: {} ===\n\n", page));

    for entry in &report.entries {
        let confidence = entry.resolution.confidence;
        let marker = if confidence.is_resolved() {
            "\u{2713}"
        } else {
            "\u{2717}"
        };

        out.push_str(&format!(
            "{} {:<13} {}  \"{}\"\n",
            marker,
            confidence.as_str(),
            entry.annotation_id,
            preview(&entry.comment)
        ));

        match &entry.element_path {
            Some(path) => out.push_str(&format!("    {}\n", path)),
            None => out.push_str(&format!("    selector: {}\n", entry.selector)),
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} resolved, {} orphaned ({} total)",
        report.resolved(),
        report.count(Confidence::Orphaned),
        report.total()
    ));

    let fuzzy: Vec<String> = Confidence::ALL
        .iter()
        .filter(|c| !matches!(c, Confidence::Exact | Confidence::Orphaned))
        .filter(|c| report.count(**c) > 0)
        .map(|c| format!("{} {}", report.count(*c), c))
        .collect();
    if !fuzzy.is_empty() {
        out.push_str(&format!("; fuzzy: {}", fuzzy.join(", ")));
    }

    out.push_str(" ===\n");

    out
}

/// Single-line comment preview, truncated with an ellipsis.
fn preview(comment: &str) -> String {
    let line = comment.lines().next().unwrap_or("");
    let mut chars = line.chars();
    let head: String = chars.by_ref().take(COMMENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() || comment.lines().count() > 1 {
        format!("{head}\u{2026}")
    } else {
        head
    }
}
