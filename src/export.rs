//! Export assembler: reshapes table rows into a flat, CSV-ready document.
//! Column sets are fixed per entity kind so repeated exports always carry
//! identical headers. File writing and download triggering live outside
//! the core.

use serde::{Deserialize, Serialize};

use crate::tables::{RipRow, StandardRow};

pub const STANDARD_COLUMNS: [&str; 8] = [
    "repository",
    "number",
    "title",
    "author",
    "status",
    "type",
    "category",
    "created_at",
];

pub const RIP_COLUMNS: [&str; 6] = [
    "repository",
    "number",
    "title",
    "author",
    "status",
    "created_at",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvDocument {
    pub fn for_standards(rows: &[StandardRow]) -> Self {
        CsvDocument {
            headers: STANDARD_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.repository.clone(),
                        r.number.to_string(),
                        r.title.clone(),
                        r.author.clone(),
                        r.status.clone(),
                        r.proposal_type.clone(),
                        r.category.clone().unwrap_or_default(),
                        r.created_at.to_rfc3339(),
                    ]
                })
                .collect(),
        }
    }

    pub fn for_rips(rows: &[RipRow]) -> Self {
        CsvDocument {
            headers: RIP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.repository.clone(),
                        r.number.to_string(),
                        r.title.clone(),
                        r.author.clone(),
                        r.status.clone(),
                        r.created_at.to_rfc3339(),
                    ]
                })
                .collect(),
        }
    }

    /// Serialize with minimal CSV quoting (fields containing a comma,
    /// quote, or newline are quoted, quotes doubled).
    pub fn render(&self) -> String {
        let mut out = String::new();
        let escape = |field: &str| -> String {
            if field.contains([',', '"', '\n']) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.to_string()
            }
        };
        out.push_str(
            &self
                .headers
                .iter()
                .map(|h| escape(h))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.iter().map(|f| escape(f)).collect::<Vec<_>>().join(","));
            out.push('\n');
        }
        out
    }
}
