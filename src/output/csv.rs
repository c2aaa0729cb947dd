use super::{FormatOptions, OutputFormatter, QueryResult, cell_text};

pub struct CsvFormatter;

fn escape(val: &str) -> String {
    if val.contains(',') || val.contains('"') || val.contains('\n') {
        format!("\"{}\"", val.replace('"', "\"\""))
    } else {
        val.to_string()
    }
}

impl OutputFormatter for CsvFormatter {
    fn format(result: &QueryResult, options: &FormatOptions) -> String {
        let mut lines = Vec::new();

        if !options.no_headers {
            lines.push(result.columns.join(","));
        }

        for row in &result.rows {
            let escaped: Vec<String> = row.iter().map(|val| escape(&cell_text(val))).collect();
            lines.push(escaped.join(","));
        }

        lines.join("\n")
    }
}
