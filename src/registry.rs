// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Table registry: joins each resource kind's schema with its fetcher
//!
//! The registry is built once from the fixed set of kinds and never changes.

use futures::StreamExt;
use futures::stream::BoxStream;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::kubernetes::{ClientProvider, DEFAULT_PAGE_SIZE, ResourceFetcher, ResourceKey, ResourceKind};
use crate::projection::{ProjectedRow, TableSchema, project};
use crate::query::QueryContext;

/// A queryable table: schema plus the fetcher bound to it
#[derive(Clone)]
pub struct Table {
    kind: ResourceKind,
    schema: Arc<TableSchema>,
    fetcher: ResourceFetcher,
}

impl Table {
    fn new(kind: ResourceKind, provider: Arc<dyn ClientProvider>, page_size: u32) -> Self {
        Self {
            kind,
            schema: Arc::new(TableSchema::for_kind(kind)),
            fetcher: ResourceFetcher::new(kind, provider).with_page_size(page_size),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.table_name()
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Stream every row of the table.
    ///
    /// Each object is projected as soon as it arrives. The stream ends after
    /// the first error, whether from the cluster or from projection.
    pub fn list(&self, ctx: QueryContext) -> BoxStream<'static, Result<ProjectedRow>> {
        let schema = Arc::clone(&self.schema);
        let table = self.name();

        debug!(table = %table, "Listing table");

        self.fetcher
            .list(ctx)
            .map(move |object| object.and_then(|obj| project(&obj, &schema)))
            .scan(false, |failed, row| {
                if *failed {
                    return futures::future::ready(None);
                }
                *failed = row.is_err();
                futures::future::ready(Some(row))
            })
            .boxed()
    }

    /// Look up a single row. A missing resource yields `Ok(None)` (zero rows).
    pub async fn get(&self, ctx: &QueryContext, key: &ResourceKey) -> Result<Option<ProjectedRow>> {
        debug!(table = %self.name(), key = %key, "Getting row");

        self.fetcher
            .get(ctx, key)
            .await?
            .map(|obj| project(&obj, &self.schema))
            .transpose()
    }
}

/// The fixed set of tables
#[derive(Clone)]
pub struct TableRegistry {
    tables: BTreeMap<&'static str, Table>,
}

impl TableRegistry {
    /// Build the registry with every kind bound to `provider`
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self::with_page_size(provider, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(provider: Arc<dyn ClientProvider>, page_size: u32) -> Self {
        let tables = ResourceKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind.table_name(),
                    Table::new(kind, Arc::clone(&provider), page_size),
                )
            })
            .collect();
        Self { tables }
    }

    /// Canonical table names, sorted
    pub fn list_table_names(&self) -> Vec<&'static str> {
        self.tables.keys().copied().collect()
    }

    /// Resolve a table by its exact canonical name
    pub fn resolve(&self, name: &str) -> Result<&Table> {
        ResourceKind::from_table_name(name)
            .and_then(|kind| self.tables.get(kind.table_name()))
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }
}
