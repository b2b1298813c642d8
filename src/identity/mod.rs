//! Client identity resolution
//!
//! The identity only namespaces the board's storage key. It is looked up
//! once from a public IP-lookup endpoint and cached in the store; any
//! failure resolves to the `"unknown"` sentinel instead of an error.

use anyhow::Result;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::board::{StorageKey, TaskStore};
use crate::config::IdentityConfig;
use crate::storage::KeyValueStore;

pub const IDENTITY_KEY: &str = "user-ip";
pub const CONSENT_KEY: &str = "cookies-accepted";
pub const UNKNOWN_IDENTITY: &str = "unknown";
pub const DEFAULT_ENDPOINT: &str = "https://api.ipify.org?format=json";

pub trait IdentityProvider {
    /// Best-effort identifier; never fails, falls back to [`UNKNOWN_IDENTITY`].
    fn fetch(&self) -> impl Future<Output = String> + Send;
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

#[derive(Debug, Clone)]
pub struct IpLookupProvider {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl IpLookupProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("taskflow/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &IdentityConfig) -> Result<Self> {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }

    async fn lookup(&self) -> Result<String> {
        let response = self.client.get(&self.endpoint).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("IP lookup failed: HTTP {}", response.status());
        }

        let body: IpResponse = response.json().await?;
        let ip = body.ip.trim();
        if ip.is_empty() {
            anyhow::bail!("IP lookup returned an empty address");
        }
        Ok(ip.to_string())
    }
}

impl IdentityProvider for IpLookupProvider {
    async fn fetch(&self) -> String {
        match tokio::time::timeout(self.timeout, self.lookup()).await {
            Ok(Ok(ip)) => {
                debug!("Resolved client identity");
                ip
            }
            Ok(Err(e)) => {
                warn!("Identity lookup failed: {}", e);
                UNKNOWN_IDENTITY.to_string()
            }
            Err(_) => {
                warn!("Identity lookup timed out after {:?}", self.timeout);
                UNKNOWN_IDENTITY.to_string()
            }
        }
    }
}

/// Previously resolved identity, if any.
pub fn cached_identity<S: KeyValueStore>(store: &S) -> Option<String> {
    match store.get(IDENTITY_KEY) {
        Ok(value) => value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
        Err(e) => {
            warn!("Failed to read cached identity: {}", e);
            None
        }
    }
}

pub fn has_consented<S: KeyValueStore>(store: &S) -> bool {
    matches!(store.get(CONSENT_KEY), Ok(Some(v)) if v == "true")
}

/// Whether the user should be asked before looking up an identity.
pub fn needs_consent<S: KeyValueStore>(store: &S) -> bool {
    !has_consented(store) && cached_identity(store).is_none()
}

/// Records consent together with the resolved identity.
pub fn record_identity<S: KeyValueStore>(store: &mut S, identity: &str) -> Result<()> {
    store.set(CONSENT_KEY, "true")?;
    store.set(IDENTITY_KEY, identity)?;
    Ok(())
}

/// Key to open the board under: an explicit override wins, then the cached
/// identity, then the anonymous key.
pub fn resolve_storage_key<S: KeyValueStore>(store: &S, identity_override: Option<&str>) -> StorageKey {
    match identity_override {
        Some(id) if !id.trim().is_empty() => StorageKey::for_identity(Some(id)),
        _ => StorageKey::for_identity(cached_identity(store).as_deref()),
    }
}

/// Caches `identity` and re-keys the board onto it, carrying an anonymous
/// list along. Returns how many tasks were carried.
///
/// A failed lookup never replaces an identity that is already cached; the
/// board stays on (or moves to) the cached key instead.
pub fn adopt_identity<S: KeyValueStore>(board: &mut TaskStore<S>, identity: &str) -> Result<usize> {
    let identity = match cached_identity(board.backend()) {
        Some(cached) if identity == UNKNOWN_IDENTITY => {
            warn!("Identity lookup failed, keeping cached identity");
            cached
        }
        _ => identity.to_string(),
    };
    record_identity(board.backend_mut(), &identity)?;
    Ok(board.rekey(StorageKey::for_identity(Some(&identity))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_adopt_identity_moves_anonymous_tasks() -> Result<()> {
        let mut board = TaskStore::open(MemoryStore::new(), StorageKey::anonymous());
        board.add("one");
        board.add("two");

        let carried = adopt_identity(&mut board, "192.0.2.1")?;

        assert_eq!(carried, 2);
        assert_eq!(board.key().as_str(), "taskflow-data-192.0.2.1");
        assert!(has_consented(board.backend()));
        assert_eq!(cached_identity(board.backend()).as_deref(), Some("192.0.2.1"));
        assert_eq!(board.backend().get("taskflow-data")?, None);
        Ok(())
    }

    #[test]
    fn test_failed_lookup_keeps_cached_identity() -> Result<()> {
        let backend = MemoryStore::new()
            .with_value(CONSENT_KEY, "true")
            .with_value(IDENTITY_KEY, "203.0.113.7")
            .with_value(
                "taskflow-data-203.0.113.7",
                r#"[{"id":"t1","text":"mine","status":"todo"}]"#,
            );
        let key = resolve_storage_key(&backend, None);
        let mut board = TaskStore::open(backend, key);

        assert_eq!(adopt_identity(&mut board, UNKNOWN_IDENTITY)?, 0);

        assert_eq!(board.key().as_str(), "taskflow-data-203.0.113.7");
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(cached_identity(board.backend()).as_deref(), Some("203.0.113.7"));
        Ok(())
    }

    #[test]
    fn test_failed_lookup_moves_anonymous_tasks_to_cached_key() -> Result<()> {
        let backend = MemoryStore::new()
            .with_value(IDENTITY_KEY, "203.0.113.7")
            .with_value(
                "taskflow-data-203.0.113.7",
                r#"[{"id":"t1","text":"mine","status":"todo"}]"#,
            );
        let mut board = TaskStore::open(backend, StorageKey::anonymous());
        board.add("typed anonymously");

        assert_eq!(adopt_identity(&mut board, UNKNOWN_IDENTITY)?, 1);
        assert_eq!(board.key().as_str(), "taskflow-data-203.0.113.7");
        assert_eq!(board.tasks().len(), 2);
        Ok(())
    }

    #[test]
    fn test_new_identity_replaces_cached_one() -> Result<()> {
        let backend = MemoryStore::new().with_value(IDENTITY_KEY, "203.0.113.7");
        let mut board = TaskStore::open(backend, StorageKey::anonymous());

        adopt_identity(&mut board, "198.51.100.1")?;
        assert_eq!(cached_identity(board.backend()).as_deref(), Some("198.51.100.1"));
        assert_eq!(board.key().as_str(), "taskflow-data-198.51.100.1");
        Ok(())
    }

    #[test]
    fn test_adopt_unknown_sentinel() -> Result<()> {
        let mut board = TaskStore::open(MemoryStore::new(), StorageKey::anonymous());
        board.add("one");

        adopt_identity(&mut board, UNKNOWN_IDENTITY)?;
        assert_eq!(board.key().as_str(), "taskflow-data-unknown");
        assert_eq!(board.tasks().len(), 1);
        Ok(())
    }

    #[test]
    fn test_no_cached_identity() {
        let store = MemoryStore::new();
        assert_eq!(cached_identity(&store), None);
        assert!(needs_consent(&store));
        assert!(resolve_storage_key(&store, None).is_anonymous());
    }

    #[test]
    fn test_blank_cached_identity_is_ignored() {
        // Accepting the banner before the lookup finished stored an empty ip.
        let store = MemoryStore::new()
            .with_value(CONSENT_KEY, "true")
            .with_value(IDENTITY_KEY, "");
        assert_eq!(cached_identity(&store), None);
        assert!(!needs_consent(&store));
        assert!(resolve_storage_key(&store, None).is_anonymous());
    }

    #[test]
    fn test_record_identity() -> Result<()> {
        let mut store = MemoryStore::new();
        record_identity(&mut store, "198.51.100.4")?;
        assert!(has_consented(&store));
        assert_eq!(cached_identity(&store).as_deref(), Some("198.51.100.4"));
        assert_eq!(
            resolve_storage_key(&store, None).as_str(),
            "taskflow-data-198.51.100.4"
        );
        Ok(())
    }

    #[test]
    fn test_override_wins_over_cache() {
        let store = MemoryStore::new().with_value(IDENTITY_KEY, "198.51.100.4");
        assert_eq!(
            resolve_storage_key(&store, Some("laptop")).as_str(),
            "taskflow-data-laptop"
        );
        assert_eq!(
            resolve_storage_key(&store, Some(" ")).as_str(),
            "taskflow-data-198.51.100.4"
        );
    }

    #[test]
    fn test_cached_identity_skips_consent() {
        let store = MemoryStore::new().with_value(IDENTITY_KEY, "unknown");
        assert!(!needs_consent(&store));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back_to_unknown() {
        // Port 9 (discard) on localhost refuses connections.
        let provider =
            IpLookupProvider::new("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
        assert_eq!(provider.fetch().await, UNKNOWN_IDENTITY);
    }
}
