// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "k8s-tables")]
#[command(author, version, about = "Query Kubernetes resources as typed tables")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Kubeconfig file to use instead of ~/.kube/config
    #[arg(long, global = true, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of its current-context
    #[arg(short, long, global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Omit column headers in output
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Give up after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List available tables
    Tables,

    /// Show the columns of a table
    Describe {
        /// Table name or alias (e.g., k8s_pod, pods, po)
        table: String,
    },

    /// Print every row of a table
    List {
        /// Table name or alias
        table: String,
    },

    /// Print a single row by name
    Get {
        /// Table name or alias
        table: String,

        /// Resource name
        name: String,

        /// Namespace of the resource (namespaced tables only)
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Yaml,
}
