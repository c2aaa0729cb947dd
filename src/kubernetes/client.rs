use async_trait::async_trait;
use kube::api::{DynamicObject, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};

use super::resources::ResourceKind;
use crate::error::{Error, Result};
use crate::query::QueryContext;

/// Key under which the process-wide client is cached.
/// One cluster connection is assumed per process.
pub const CONNECTOR_KEY: &str = "k8s";

/// One page of a paginated list call
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub items: Vec<serde_json::Value>,
    /// Token for the next page, None on the last page
    pub continue_token: Option<String>,
}

/// Raw cluster API operations the fetchers need.
///
/// Errors are returned untouched so the fetcher can classify them
/// (e.g. 404 on get is an absent resource, not a failure).
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List one page of `kind` across all namespaces
    async fn list_page(
        &self,
        kind: ResourceKind,
        limit: u32,
        continue_token: Option<String>,
    ) -> Result<ListPage, kube::Error>;

    /// Get a single object by name (and namespace for namespaced kinds)
    async fn get(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<serde_json::Value, kube::Error>;
}

/// Shared handle to the cluster API
pub type ClientHandle = Arc<dyn ClusterApi>;

/// Builds a fresh client handle. Called at most once per cached provider.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn build(&self) -> Result<ClientHandle>;
}

/// Hands out the client handle for a call
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn acquire(&self, ctx: &QueryContext) -> Result<ClientHandle>;
}

/// [`ClusterApi`] backed by a kube [`Client`], using dynamic objects so every
/// kind goes through the same code path
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, kind: ResourceKind, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = kind.api_resource();
        match namespace {
            Some(ns) if kind.is_namespaced() => Api::namespaced_with(self.client.clone(), ns, &ar),
            _ => Api::all_with(self.client.clone(), &ar),
        }
    }
}

fn to_json(object: DynamicObject) -> Result<serde_json::Value, kube::Error> {
    serde_json::to_value(object).map_err(kube::Error::SerdeError)
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_page(
        &self,
        kind: ResourceKind,
        limit: u32,
        continue_token: Option<String>,
    ) -> Result<ListPage, kube::Error> {
        let api = self.api(kind, None);
        let mut params = ListParams::default().limit(limit);
        if let Some(ref token) = continue_token {
            params = params.continue_token(token);
        }

        trace!(kind = %kind, limit = limit, continued = continue_token.is_some(), "Listing page");

        let list = api.list(&params).await?;
        let items = list
            .items
            .into_iter()
            .map(to_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListPage {
            items,
            continue_token: list.metadata.continue_.filter(|t| !t.is_empty()),
        })
    }

    async fn get(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<serde_json::Value, kube::Error> {
        trace!(kind = %kind, namespace = ?namespace, name = %name, "Getting object");
        let object = self.api(kind, namespace).get(name).await?;
        to_json(object)
    }
}

/// Builds a kube client from a kubeconfig file, resolved on first use
#[derive(Debug, Clone)]
pub struct KubeconfigFactory {
    /// Explicit kubeconfig path; ~/.kube/config when None
    path: Option<PathBuf>,
    context: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl KubeconfigFactory {
    pub fn new(path: Option<PathBuf>, context: Option<String>) -> Self {
        let defaults = crate::config::Config::default();
        Self {
            path,
            context,
            connect_timeout: defaults.connect_timeout(),
            read_timeout: defaults.read_timeout(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            path: config.kubeconfig.clone(),
            context: config.context.clone(),
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
        }
    }

    fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => crate::config::default_kubeconfig_path()
                .map_err(|e| Error::config("cannot locate the default kubeconfig", e)),
        }
    }
}

#[async_trait]
impl ClientFactory for KubeconfigFactory {
    async fn build(&self) -> Result<ClientHandle> {
        let path = self.resolve_path()?;

        debug!(path = %path.display(), context = ?self.context, "Reading kubeconfig");

        let kubeconfig = Kubeconfig::read_from(&path).map_err(|e| {
            Error::config(format!("cannot read kubeconfig {}", path.display()), e)
        })?;

        let mut config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: self.context.clone(),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| Error::config(format!("cannot load kubeconfig {}", path.display()), e))?;

        // Set timeouts for reliability
        config.connect_timeout = Some(self.connect_timeout);
        config.read_timeout = Some(self.read_timeout);

        let cluster_url = config.cluster_url.to_string();
        let client = Client::try_from(config)
            .map_err(|e| Error::config(format!("cannot create client for {}", cluster_url), e))?;

        info!(cluster = %cluster_url, "Created Kubernetes client");

        Ok(Arc::new(KubeClusterApi::new(client)))
    }
}

/// Provider that builds its client once and hands out the cached handle
/// afterwards.
///
/// Concurrent first calls wait on a single construction; a failed
/// construction leaves the cache empty so the next call retries.
pub struct CachedClientProvider<F> {
    key: &'static str,
    factory: F,
    handle: OnceCell<ClientHandle>,
}

impl<F: ClientFactory> CachedClientProvider<F> {
    pub fn new(factory: F) -> Self {
        Self {
            key: CONNECTOR_KEY,
            factory,
            handle: OnceCell::new(),
        }
    }

    /// Whether a handle has been constructed and cached
    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }
}

#[async_trait]
impl<F: ClientFactory> ClientProvider for CachedClientProvider<F> {
    async fn acquire(&self, ctx: &QueryContext) -> Result<ClientHandle> {
        if let Some(handle) = self.handle.get() {
            trace!(key = self.key, "Client found in cache");
            return Ok(Arc::clone(handle));
        }

        let handle = ctx
            .run(self.handle.get_or_try_init(|| async {
                let start = Instant::now();
                let handle = self.factory.build().await?;
                debug!(
                    key = self.key,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Client cached"
                );
                Ok::<_, Error>(handle)
            }))
            .await?;

        Ok(Arc::clone(handle))
    }
}

/// Process-wide provider backed by the user's kubeconfig.
///
/// The first caller's configuration wins; later calls return the same
/// provider regardless of the config they pass.
pub fn shared_provider(config: &crate::config::Config) -> Arc<dyn ClientProvider> {
    static SHARED: OnceLock<Arc<CachedClientProvider<KubeconfigFactory>>> = OnceLock::new();

    let provider = SHARED.get_or_init(|| {
        Arc::new(CachedClientProvider::new(KubeconfigFactory::from_config(
            config,
        )))
    });
    Arc::clone(provider) as Arc<dyn ClientProvider>
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::testing::FakeCluster;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Factory that counts constructions and can be told to fail
    struct CountingFactory {
        builds: AtomicUsize,
        failures_left: AtomicUsize,
        delay: Duration,
    }

    impl CountingFactory {
        fn new(delay: Duration) -> Self {
            Self {
                builds: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(0),
                delay,
            }
        }

        fn failing_first(self, failures: usize) -> Self {
            self.failures_left.store(failures, Ordering::SeqCst);
            self
        }
    }

    #[async_trait]
    impl ClientFactory for CountingFactory {
        async fn build(&self) -> Result<ClientHandle> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;

            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(Error::config(
                    "boom",
                    std::io::Error::other("factory failure"),
                ));
            }
            Ok(Arc::new(FakeCluster::default()))
        }
    }

    #[tokio::test]
    async fn test_cached_after_first_acquire() {
        let provider = CachedClientProvider::new(CountingFactory::new(Duration::ZERO));
        let ctx = QueryContext::new();

        assert!(!provider.is_initialized());
        let first = provider.acquire(&ctx).await.unwrap();
        let second = provider.acquire(&ctx).await.unwrap();

        assert!(provider.is_initialized());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.factory.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_acquire_builds_once() {
        let provider = Arc::new(CachedClientProvider::new(CountingFactory::new(
            Duration::from_millis(50),
        )));

        let a = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.acquire(&QueryContext::new()).await })
        };
        let b = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.acquire(&QueryContext::new()).await })
        };

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(provider.factory.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_build_does_not_populate_cache() {
        let provider =
            CachedClientProvider::new(CountingFactory::new(Duration::ZERO).failing_first(1));
        let ctx = QueryContext::new();

        let err = provider.acquire(&ctx).await.err().unwrap();
        assert!(matches!(err, Error::ConfigResolution { .. }));
        assert!(!provider.is_initialized());

        // The next call retries construction and succeeds
        provider.acquire(&ctx).await.unwrap();
        assert!(provider.is_initialized());
        assert_eq!(provider.factory.builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_acquire_leaves_cache_empty() {
        let provider = CachedClientProvider::new(CountingFactory::new(Duration::from_secs(30)));
        let ctx = QueryContext::new().with_timeout(Duration::from_millis(10));

        let err = provider.acquire(&ctx).await.err().unwrap();
        assert!(matches!(err, Error::DeadlineExceeded));
        assert!(!provider.is_initialized());
    }

    #[tokio::test]
    async fn test_kubeconfig_factory_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let factory = KubeconfigFactory::new(Some(temp_dir.path().join("config")), None);

        let err = factory.build().await.err().unwrap();
        assert!(matches!(err, Error::ConfigResolution { .. }));
        assert!(err.to_string().contains("cannot read kubeconfig"));
    }

    #[tokio::test]
    async fn test_kubeconfig_factory_unparseable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config");
        std::fs::write(&path, "{{{ not: [yaml").unwrap();

        let factory = KubeconfigFactory::new(Some(path), None);
        let err = factory.build().await.err().unwrap();
        assert!(matches!(err, Error::ConfigResolution { .. }));
    }

    #[tokio::test]
    async fn test_kubeconfig_factory_unknown_context() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config");
        std::fs::write(
            &path,
            r#"
apiVersion: v1
kind: Config
clusters:
- name: local
  cluster:
    server: https://127.0.0.1:6443
users:
- name: admin
  user:
    token: abc
contexts:
- name: local
  context:
    cluster: local
    user: admin
current-context: local
"#,
        )
        .unwrap();

        let factory = KubeconfigFactory::new(Some(path), Some("missing".to_string()));
        let err = factory.build().await.err().unwrap();
        assert!(matches!(err, Error::ConfigResolution { .. }));
    }

    #[test]
    fn test_factory_from_config() {
        let config = crate::config::Config {
            kubeconfig: Some(PathBuf::from("/etc/kc")),
            context: Some("prod".to_string()),
            connect_timeout_secs: 2,
            ..Default::default()
        };
        let factory = KubeconfigFactory::from_config(&config);
        assert_eq!(factory.resolve_path().unwrap(), PathBuf::from("/etc/kc"));
        assert_eq!(factory.context.as_deref(), Some("prod"));
        assert_eq!(factory.connect_timeout, Duration::from_secs(2));
    }
}
