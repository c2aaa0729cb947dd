use std::borrow::Cow;
use std::collections::HashSet;

use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};

use super::{FormatOptions, OutputFormatter, QueryResult, cell_text};

/// Maximum width for structured columns in table mode
const MAX_JSON_COLUMN_WIDTH: usize = 60;

/// Columns that should have width limits in table mode
const WIDE_COLUMNS: &[&str] = &[
    "spec",
    "status",
    "labels",
    "annotations",
    "raw",
    "managed_fields",
    "template",
    "containers",
    "conditions",
];

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format(result: &QueryResult, options: &FormatOptions) -> String {
        if result.rows.is_empty() {
            return "(0 rows)".to_string();
        }

        let mut table = Table::new();
        // ASCII_BORDERS_ONLY_CONDENSED is close to psql style
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);

        let truncate_cols: HashSet<usize> = result
            .columns
            .iter()
            .enumerate()
            .filter(|(_, col)| WIDE_COLUMNS.contains(&col.as_str()))
            .map(|(idx, _)| idx)
            .collect();

        if !options.no_headers {
            table.set_header(&result.columns);
        }

        for row in &result.rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(idx, val)| {
                    let text = cell_text(val);
                    if truncate_cols.contains(&idx) {
                        truncate_value(&text, MAX_JSON_COLUMN_WIDTH).into_owned()
                    } else {
                        text
                    }
                })
                .collect();
            table.add_row(cells);
        }

        let output = table.to_string();
        format!("{}\n({} rows)", output, result.rows.len())
    }
}
