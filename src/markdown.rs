use crate::types::{Paragraph, Shape, ShapeKind, TableElement};
use log::{debug, warn};

/// Label line written above the quoted speaker notes.
pub(crate) const NOTES_LABEL: &str = "**Notes:**";

/// Renders a (possibly jagged) table as a Markdown table.
///
/// The first row becomes the header. Every row is padded on the right with empty cells up to the
/// widest row, so each rendered line carries the same number of cells. Literal `|` characters in
/// cells are escaped.
///
/// # Returns
///
/// The table lines joined by `\n`, or an empty string for a table without rows.
pub fn render_table(table: &TableElement) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| cell.text.trim().replace('|', "\\|"))
                .collect()
        })
        .collect();

    let Some(col_count) = rows.iter().map(Vec::len).max() else {
        return String::new();
    };

    let format_row = |cells: &[String]| format!("| {} |", cells.join(" | "));

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (idx, mut row) in rows.into_iter().enumerate() {
        row.resize(col_count, String::new());
        lines.push(format_row(&row));

        if idx == 0 {
            let separator = vec!["---".to_string(); col_count];
            lines.push(format_row(&separator));
        }
    }

    lines.join("\n")
}

/// Formats a single paragraph as one Markdown line.
///
/// Level `0` is plain text. Level `1` is a top level bullet (`- text`) and each deeper level adds
/// two spaces of indentation in front of the marker.
///
/// Returns `None` when the paragraph has no text after trimming.
pub fn format_paragraph(paragraph: &Paragraph) -> Option<String> {
    let text = paragraph.text.trim();
    if text.is_empty() {
        return None;
    }

    match paragraph.level {
        0 => Some(text.to_string()),
        level => {
            let indent = "  ".repeat(level as usize - 1);
            Some(format!("{}- {}", indent, text))
        }
    }
}

/// Converts a shape into its ordered Markdown fragments.
///
/// Tables yield a single fragment, text shapes one fragment per non-empty paragraph and groups
/// the fragments of their children, depth-first in document order. Shapes without extractable
/// text yield nothing.
///
/// Groups nested deeper than `max_depth` levels are not descended into.
pub fn extract_shape_text(shape: &Shape, max_depth: usize) -> Vec<String> {
    let mut fragments = Vec::new();
    collect_fragments(shape, 0, max_depth, &mut fragments);
    fragments
}

fn collect_fragments(shape: &Shape, depth: usize, max_depth: usize, out: &mut Vec<String>) {
    match &shape.kind {
        ShapeKind::Table(table) => {
            let table_md = render_table(table);
            if !table_md.is_empty() {
                out.push(table_md);
            }
        }
        ShapeKind::Text(text) => {
            out.extend(text.paragraphs.iter().filter_map(format_paragraph));
        }
        ShapeKind::Group(group) => {
            if depth >= max_depth {
                warn!(
                    "Group shape {} is nested deeper than {} levels, its content is skipped",
                    shape.id, max_depth
                );
                return;
            }
            for child in &group.shapes {
                collect_fragments(child, depth + 1, max_depth, out);
            }
        }
        ShapeKind::Other => {
            debug!("Shape {} has no extractable text", shape.id);
        }
    }
}

/// Formats speaker notes as a labelled block quote.
///
/// Absent or blank notes produce `None`.
pub fn format_notes(notes: Option<&str>) -> Option<String> {
    let notes = notes?.trim();
    if notes.is_empty() {
        return None;
    }

    let quoted = notes
        .lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("{}\n{}", NOTES_LABEL, quoted))
}

/// Joins fragments with exactly one blank line between neighbours.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.as_ref())
        .collect::<Vec<&str>>()
        .join("\n\n")
}
