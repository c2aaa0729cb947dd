// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod output;
mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use cli::{Args, Command};
use k8s_tables::config::{self, Config};
use k8s_tables::kubernetes::{ResourceKey, ResourceKind, shared_provider};
use k8s_tables::{QueryContext, Table, TableRegistry};
use output::QueryResult;

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool, to_stderr: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    // Create log directory
    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // File appender with size-based rotation:
    // - Max 10MB per file
    // - Keep up to 5 files (total max ~50MB)
    // - Also rotate daily
    let log_path = log_dir.join("k8s-tables.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024); // 10MB

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose {
        "k8s_tables=debug"
    } else {
        "k8s_tables=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    // File layer (always enabled)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if to_stderr {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (aws-lc-rs)
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let args = Args::parse();

    // Always log to file (~/.k8s-tables/log/k8s-tables.log), and to stderr with -v
    init_logging(args.verbose, args.verbose);

    let config = Config::load()?.with_overrides(args.kubeconfig.clone(), args.context.clone());
    debug!(config = ?config, "Loaded configuration");

    let registry = TableRegistry::with_page_size(shared_provider(&config), config.page_size);

    let mut ctx = QueryContext::new();
    if let Some(secs) = args.timeout {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }
    cancel_on_ctrl_c(&ctx);

    let result = match &args.command {
        Command::Tables => tables_result(&registry),
        Command::Describe { table } => describe_result(resolve_table(&registry, table)?),
        Command::List { table } => list_rows(resolve_table(&registry, table)?, ctx).await?,
        Command::Get {
            table,
            name,
            namespace,
        } => {
            let key = match namespace {
                Some(ns) => ResourceKey::namespaced(name, ns),
                None => ResourceKey::cluster_scoped(name),
            };
            get_row(resolve_table(&registry, table)?, &ctx, &key).await?
        }
    };

    println!("{}", result.format(&args.output, args.no_headers));
    Ok(())
}

/// Accept kubectl-style names (pods, po, deploy, ...) on the command line,
/// then resolve the canonical table
fn resolve_table<'a>(registry: &'a TableRegistry, name: &str) -> k8s_tables::Result<&'a Table> {
    let canonical = ResourceKind::from_alias(name).map_or(name, |kind| kind.table_name());
    registry.resolve(canonical)
}

/// Cancel the query context on Ctrl-C so the in-flight call is aborted
fn cancel_on_ctrl_c(ctx: &QueryContext) {
    let token = ctx.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling query");
            token.cancel();
        }
    });
}

fn tables_result(registry: &TableRegistry) -> QueryResult {
    let mut result = QueryResult::new(
        ["table_name", "kind", "api_version", "scope", "description"]
            .map(String::from)
            .to_vec(),
    );

    for name in registry.list_table_names() {
        if let Ok(table) = registry.resolve(name) {
            let ar = table.kind().api_resource();
            let scope = if table.kind().is_namespaced() {
                "Namespaced"
            } else {
                "Cluster"
            };
            result.rows.push(vec![
                Value::from(table.name()),
                Value::from(ar.kind),
                Value::from(ar.api_version),
                Value::from(scope),
                Value::from(table.description()),
            ]);
        }
    }
    result
}

fn describe_result(table: &Table) -> QueryResult {
    let mut result = QueryResult::new(
        ["column_name", "data_type", "description"]
            .map(String::from)
            .to_vec(),
    );

    for column in table.schema().columns() {
        result.rows.push(vec![
            Value::from(column.name),
            Value::from(column.column_type.as_str()),
            Value::from(column.description),
        ]);
    }
    result
}

async fn list_rows(table: &Table, ctx: QueryContext) -> Result<QueryResult> {
    let spinner = progress::spinner_for_stderr(&format!("Fetching {}...", table.name()));
    let mut result = QueryResult::for_schema(table.schema());
    let mut rows = table.list(ctx);

    while let Some(row) = rows.next().await {
        match row {
            Ok(row) => {
                result.push_row(&row);
                progress::report_rows(&spinner, table.name(), result.row_count());
            }
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e).with_context(|| format!("Failed to list {}", table.name()));
            }
        }
    }

    spinner.finish_and_clear();
    info!(table = %table.name(), rows = result.row_count(), "List complete");
    Ok(result)
}

async fn get_row(table: &Table, ctx: &QueryContext, key: &ResourceKey) -> Result<QueryResult> {
    let spinner = progress::spinner_for_stderr(&format!("Fetching {} {}...", table.name(), key));
    let row = table.get(ctx, key).await;
    spinner.finish_and_clear();

    let mut result = QueryResult::for_schema(table.schema());
    if let Some(row) = row.with_context(|| format!("Failed to get {} {}", table.name(), key))? {
        result.push_row(&row);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table_accepts_cli_shorthand() {
        let registry = TableRegistry::new(shared_provider(&Config::default()));

        assert_eq!(resolve_table(&registry, "po").unwrap().name(), "k8s_pod");
        assert_eq!(resolve_table(&registry, "Deployments").unwrap().name(), "k8s_deployment");
        assert_eq!(resolve_table(&registry, "k8s_node").unwrap().name(), "k8s_node");
        assert!(resolve_table(&registry, "bogus").is_err());
    }
}
