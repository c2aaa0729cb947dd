// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Progress reporting for long-running fetches

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Create a spinner with consistent styling
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Spinner shown only when stderr is a terminal; hidden otherwise so piped
/// output stays clean
pub fn spinner_for_stderr(msg: &str) -> ProgressBar {
    if std::io::stderr().is_terminal() {
        create_spinner(msg)
    } else {
        ProgressBar::hidden()
    }
}

/// Report rows fetched so far on a spinner
pub fn report_rows(pb: &ProgressBar, table: &str, rows: usize) {
    pb.set_message(format!("Fetching {}... {} rows", table, rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner_message() {
        let pb = create_spinner("Connecting to Kubernetes...");
        assert_eq!(pb.message(), "Connecting to Kubernetes...");
        pb.finish_and_clear();
    }

    #[test]
    fn test_report_rows() {
        let pb = ProgressBar::hidden();
        report_rows(&pb, "k8s_pod", 42);
        assert_eq!(pb.message(), "Fetching k8s_pod... 42 rows");
    }
}
