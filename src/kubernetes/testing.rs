//! In-memory cluster used by unit tests

use async_trait::async_trait;
use kube::core::ErrorResponse;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::client::{ClientHandle, ClientProvider, ClusterApi, ListPage};
use super::resources::ResourceKind;
use crate::error::Result;
use crate::query::QueryContext;

/// Build an API error the way the server reports it
pub fn api_error(code: u16, reason: &str, message: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    })
}

/// Fake cluster holding raw objects per kind.
///
/// Objects are stored without apiVersion/kind, the way list responses carry
/// them. Errors can be injected per kind and operation; lists are paged by
/// position.
#[derive(Default)]
pub struct FakeCluster {
    objects: Mutex<HashMap<ResourceKind, Vec<Value>>>,
    list_errors: Mutex<HashMap<ResourceKind, (u16, String)>>,
    /// Fail list calls after this many pages have been served
    fail_after_pages: Mutex<Option<(usize, u16)>>,
    get_errors: Mutex<HashMap<ResourceKind, (u16, String)>>,
    pub list_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(self, kind: ResourceKind, objects: Vec<Value>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .extend(objects);
        self
    }

    pub fn with_list_error(self, kind: ResourceKind, code: u16, message: &str) -> Self {
        self.list_errors
            .lock()
            .unwrap()
            .insert(kind, (code, message.to_string()));
        self
    }

    pub fn with_list_error_after(self, pages: usize, code: u16) -> Self {
        *self.fail_after_pages.lock().unwrap() = Some((pages, code));
        self
    }

    pub fn with_get_error(self, kind: ResourceKind, code: u16, message: &str) -> Self {
        self.get_errors
            .lock()
            .unwrap()
            .insert(kind, (code, message.to_string()));
        self
    }

    pub fn into_provider(self) -> Arc<StaticProvider> {
        Arc::new(StaticProvider::new(Arc::new(self)))
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_page(
        &self,
        kind: ResourceKind,
        limit: u32,
        continue_token: Option<String>,
    ) -> Result<ListPage, kube::Error> {
        let served = self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((code, message)) = self.list_errors.lock().unwrap().get(&kind) {
            return Err(api_error(*code, "InternalError", message));
        }
        if let Some((pages, code)) = *self.fail_after_pages.lock().unwrap()
            && served >= pages
        {
            return Err(api_error(code, "Expired", "continue token expired"));
        }

        let objects = self.objects.lock().unwrap();
        let all = objects.get(&kind).map(Vec::as_slice).unwrap_or_default();

        let start: usize = continue_token.map_or(0, |t| t.parse().unwrap());
        let end = (start + limit.max(1) as usize).min(all.len());

        Ok(ListPage {
            items: all[start..end].to_vec(),
            continue_token: (end < all.len()).then(|| end.to_string()),
        })
    }

    async fn get(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Value, kube::Error> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((code, message)) = self.get_errors.lock().unwrap().get(&kind) {
            return Err(api_error(*code, "InternalError", message));
        }

        let objects = self.objects.lock().unwrap();
        objects
            .get(&kind)
            .and_then(|all| {
                all.iter().find(|obj| {
                    obj["metadata"]["name"].as_str() == Some(name)
                        && obj["metadata"]["namespace"].as_str() == namespace
                })
            })
            .cloned()
            .ok_or_else(|| {
                api_error(
                    404,
                    "NotFound",
                    &format!("{} \"{}\" not found", kind.api_resource().plural, name),
                )
            })
    }
}

/// Provider that always hands out the same handle
pub struct StaticProvider {
    handle: ClientHandle,
}

impl StaticProvider {
    pub fn new(handle: ClientHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl ClientProvider for StaticProvider {
    async fn acquire(&self, ctx: &QueryContext) -> Result<ClientHandle> {
        ctx.run(async { Ok(Arc::clone(&self.handle)) }).await
    }
}
