mod client;
mod fetch;
mod resources;
#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    CONNECTOR_KEY, CachedClientProvider, ClientFactory, ClientHandle, ClientProvider, ClusterApi,
    KubeClusterApi, KubeconfigFactory, ListPage, shared_provider,
};
pub use fetch::{DEFAULT_PAGE_SIZE, ResourceFetcher, is_not_found, with_type_meta};
pub use resources::{ResourceKey, ResourceKind};
