//! JSON renderer.

use ditables_core::{FeatureCell, FeatureTable, FrameworkColumn};
use serde_json::{Value, json};

use crate::version::DITABLES_VERSION;

/// Render every table into one pretty-printed JSON document.
pub fn render(tables: &[FeatureTable]) -> String {
    format!("{:#}\n", to_value(tables))
}

/// Structured form of a report.
pub fn to_value(tables: &[FeatureTable]) -> Value {
    json!({
        "generator": {
            "name": "ditables",
            "version": DITABLES_VERSION,
        },
        "tables": tables.iter().map(table_value).collect::<Vec<_>>(),
    })
}

fn table_value(table: &FeatureTable) -> Value {
    json!({
        "group": table.group.as_str(),
        "name": table.name,
        "description": table.description,
        "scoring": table.scoring.value(),
        "frameworks": table.frameworks.iter().map(column_value).collect::<Vec<_>>(),
        "rows": table.rows().iter().map(|row| json!({
            "test": row.feature.test.as_str(),
            "name": row.feature.display_name,
            "description": row.feature.description,
            "cells": row
                .cells
                .iter()
                .zip(&table.frameworks)
                .map(|(cell, column)| cell_value(cell, column))
                .collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}

fn column_value(column: &FrameworkColumn) -> Value {
    json!({
        "id": column.id.as_str(),
        "name": column.display_name,
        "version": column.version,
        "url": column.url,
    })
}

fn cell_value(cell: &FeatureCell, column: &FrameworkColumn) -> Value {
    json!({
        "framework": column.id.as_str(),
        "value": cell.display_value,
        "state": cell.state.as_str(),
        "comment": cell.comment,
        "error": cell.raw_error,
        "uri": cell.display_uri,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditables_core::{Feature, FeatureGroup, FeatureRow, FeatureState};

    #[test]
    fn test_cell_fields() {
        let group = FeatureGroup::new("basic", "Basic");
        let column = FrameworkColumn {
            id: "registry".into(),
            display_name: "Registry".to_string(),
            version: None,
            url: None,
        };
        let mut table = FeatureTable::new(&group, vec![column]);
        let mut cell = FeatureCell::new(FeatureState::Concern);
        cell.comment = Some("ambiguous".to_string());
        table
            .push_row(FeatureRow {
                feature: Feature {
                    test: "basic.singleton".into(),
                    display_name: "Singleton".to_string(),
                    description: None,
                },
                cells: vec![cell],
            })
            .unwrap();

        let value = to_value(&[table]);
        let cell = &value["tables"][0]["rows"][0]["cells"][0];
        assert_eq!(cell["framework"], "registry");
        assert_eq!(cell["value"], "see comment");
        assert_eq!(cell["state"], "concern");
        assert_eq!(cell["comment"], "ambiguous");
        assert!(cell["error"].is_null());
        assert_eq!(value["generator"]["version"], DITABLES_VERSION);
    }
}
