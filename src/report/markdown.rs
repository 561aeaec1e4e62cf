//! GitHub-flavored Markdown renderer.
//!
//! One section per table. Failed cells link to the data URI of their sanitized trace, and comments follow the
//! value in italics.

use std::fmt::Write as _;

use ditables_core::{FeatureCell, FeatureTable, FrameworkColumn};

use crate::version::DITABLES_VERSION;

/// Document title and generator line.
pub fn render_header() -> String {
    format!("# Dependency injection feature tables\n\n_Generated by ditables {DITABLES_VERSION}._\n")
}

/// Render a full document: header followed by every table.
pub fn render(tables: &[FeatureTable]) -> String {
    let mut out = render_header();
    for table in tables {
        out.push('\n');
        out.push_str(&render_table(table));
    }
    out
}

/// Render one table as a section.
pub fn render_table(table: &FeatureTable) -> String {
    let mut out = String::new();
    // Writing to String cannot fail.
    let _ = writeln!(out, "## {}\n", escape(&table.name));
    if let Some(description) = &table.description {
        let _ = writeln!(out, "{description}\n");
    }

    out.push_str("| Feature |");
    for column in &table.frameworks {
        let _ = write!(out, " {} |", column_header(column));
    }
    out.push_str("\n|---|");
    for _ in &table.frameworks {
        out.push_str("---|");
    }
    out.push('\n');

    for row in table.rows() {
        let _ = write!(out, "| {} |", escape(&row.feature.display_name));
        for cell in &row.cells {
            let _ = write!(out, " {} |", render_cell(cell));
        }
        out.push('\n');
    }
    out
}

fn column_header(column: &FrameworkColumn) -> String {
    let name = escape(&column.display_name);
    let name = match &column.url {
        Some(url) => format!("[{name}]({url})"),
        None => name,
    };
    match &column.version {
        Some(version) => format!("{name} {}", escape(version)),
        None => name,
    }
}

fn render_cell(cell: &FeatureCell) -> String {
    let mut out = match &cell.display_uri {
        Some(uri) => format!("[{}]({uri})", cell.display_value),
        None => cell.display_value.to_string(),
    };
    if let Some(comment) = &cell.comment {
        let _ = write!(out, " _{}_", escape(comment));
    }
    out
}

/// Make text safe inside a table cell.
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a|b\nc"), "a\\|b<br>c");
    }

    #[test]
    fn test_cell_with_uri_and_comment() {
        let mut cell = FeatureCell::new(ditables_core::FeatureState::Failure);
        cell.display_uri = Some("data:text/plain;base64,eA==".to_string());
        cell.comment = Some("timed out".to_string());
        assert_eq!(render_cell(&cell), "[failed](data:text/plain;base64,eA==) _timed out_");
    }

    #[test]
    fn test_column_header() {
        let column = FrameworkColumn {
            id: "registry".into(),
            display_name: "Registry".to_string(),
            version: Some("1.2".to_string()),
            url: Some("https://example.org".to_string()),
        };
        assert_eq!(column_header(&column), "[Registry](https://example.org) 1.2");
    }
}
