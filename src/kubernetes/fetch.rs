// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Per-kind fetchers: list every object of a kind, or get one by key

use async_stream::try_stream;
use futures::stream::BoxStream;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::client::{ClientProvider, ClusterApi, ListPage};
use super::resources::{ResourceKey, ResourceKind};
use crate::error::{Error, Operation, Result};
use crate::query::QueryContext;

/// Default page size for paginated list calls
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Check if an error is a Kubernetes "not found" (404) error
///
/// Decided by the status code alone; the message text is never inspected.
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}

/// Inject apiVersion and kind (K8s list API doesn't include these per-item)
pub fn with_type_meta(kind: ResourceKind, mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        let ar = kind.api_resource();
        map.insert("apiVersion".to_string(), Value::String(ar.api_version));
        map.insert("kind".to_string(), Value::String(ar.kind));
    }
    value
}

/// Retrieves raw objects of a single kind through the shared client provider
#[derive(Clone)]
pub struct ResourceFetcher {
    kind: ResourceKind,
    provider: Arc<dyn ClientProvider>,
    page_size: u32,
}

impl ResourceFetcher {
    pub fn new(kind: ResourceKind, provider: Arc<dyn ClientProvider>) -> Self {
        Self {
            kind,
            provider,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Stream every object of this kind across all namespaces.
    ///
    /// Pages are requested lazily as the consumer pulls. The first upstream
    /// error ends the stream; objects already yielded stay delivered.
    pub fn list(&self, ctx: QueryContext) -> BoxStream<'static, Result<Value>> {
        let kind = self.kind;
        let provider = Arc::clone(&self.provider);
        let page_size = self.page_size;

        let stream = try_stream! {
            let start = Instant::now();
            let client = provider.acquire(&ctx).await?;

            let mut continue_token: Option<String> = None;
            let mut page_count = 0u32;
            let mut total = 0usize;

            loop {
                let page = ctx
                    .run(list_page(client.as_ref(), kind, page_size, continue_token.take()))
                    .await?;
                page_count += 1;
                total += page.items.len();

                debug!(
                    kind = %kind,
                    page = page_count,
                    items_this_page = page.items.len(),
                    total_so_far = total,
                    "Fetched page"
                );

                for item in page.items {
                    ctx.check()?;
                    yield with_type_meta(kind, item);
                }

                match page.continue_token {
                    Some(token) => continue_token = Some(token),
                    None => break,
                }
            }

            debug!(
                kind = %kind,
                pages = page_count,
                total_items = total,
                elapsed_ms = start.elapsed().as_millis(),
                "List complete"
            );
        };

        Box::pin(stream)
    }

    /// Get one object by key. A missing object is `Ok(None)`.
    pub async fn get(&self, ctx: &QueryContext, key: &ResourceKey) -> Result<Option<Value>> {
        key.validate_for(self.kind)?;

        let client = self.provider.acquire(ctx).await?;
        let kind = self.kind;

        debug!(kind = %kind, key = %key, "Fetching K8s resource");

        let fetched = ctx
            .run(async {
                match client.get(kind, key.namespace.as_deref(), &key.name).await {
                    Ok(value) => Ok(Some(value)),
                    Err(e) if is_not_found(&e) => Ok(None),
                    Err(source) => Err(Error::UpstreamFetch {
                        kind,
                        operation: Operation::Get,
                        source,
                    }),
                }
            })
            .await?;

        if fetched.is_none() {
            debug!(kind = %kind, key = %key, "Resource not found, returning empty result");
        }

        Ok(fetched.map(|value| with_type_meta(kind, value)))
    }
}

async fn list_page(
    client: &dyn ClusterApi,
    kind: ResourceKind,
    limit: u32,
    continue_token: Option<String>,
) -> Result<ListPage> {
    client
        .list_page(kind, limit, continue_token)
        .await
        .map_err(|source| {
            debug!(kind = %kind, error = %source, "List failed");
            Error::UpstreamFetch {
                kind,
                operation: Operation::List,
                source,
            }
        })
}
