mod csv;
mod json;
mod table;
mod yaml;

pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use serde_json::Value;

use crate::cli::OutputFormat;
use k8s_tables::projection::{ProjectedRow, TableSchema};

/// Options shared by all formatters
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub no_headers: bool,
}

pub trait OutputFormatter {
    fn format(result: &QueryResult, options: &FormatOptions) -> String;
}

/// Rows collected for printing, in column order
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Empty result with the columns of a table schema
    pub fn for_schema(schema: &TableSchema) -> Self {
        Self::new(schema.column_names().into_iter().map(String::from).collect())
    }

    /// Append a projected row; absent cells become null
    pub fn push_row(&mut self, row: &ProjectedRow) {
        self.rows.push(
            row.cells()
                .iter()
                .map(|(_, cell)| cell.as_ref().map_or(Value::Null, |c| c.to_json()))
                .collect(),
        );
    }

    pub fn format(&self, format: &OutputFormat, no_headers: bool) -> String {
        let options = FormatOptions { no_headers };
        match format {
            OutputFormat::Table => TableFormatter::format(self, &options),
            OutputFormat::Json => JsonFormatter::format(self, &options),
            OutputFormat::Csv => CsvFormatter::format(self, &options),
            OutputFormat::Yaml => YamlFormatter::format(self, &options),
        }
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_rows(&self) -> Vec<serde_json::Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Text form of a cell for table and CSV output. Null prints as empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
