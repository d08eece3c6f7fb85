// Memoization of loaded tables keyed by file path
use crate::application::inventory_repository::InventoryRepository;
use crate::domain::error::LoadError;
use crate::domain::table::Table;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// When a cached table must be read again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Keep entries for the lifetime of the process
    Session,
    /// Reload entries older than the given age
    Ttl(Duration),
}

impl CachePolicy {
    pub fn from_ttl(ttl: Option<Duration>) -> Self {
        match ttl {
            Some(ttl) => CachePolicy::Ttl(ttl),
            None => CachePolicy::Session,
        }
    }
}

struct CachedTable {
    table: Arc<Table>,
    loaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TableCache {
    repository: Arc<dyn InventoryRepository>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    entries: Arc<Mutex<HashMap<PathBuf, CachedTable>>>,
}

impl TableCache {
    pub fn new(
        repository: Arc<dyn InventoryRepository>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            repository,
            clock,
            policy,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cached table for `path`, loading it on first use or after expiry.
    /// Failed loads are not cached.
    pub async fn get(&self, path: &Path) -> Result<Arc<Table>, LoadError> {
        // Held across the load so concurrent requests read the file once
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();

        if let Some(entry) = entries.get(path) {
            if self.is_fresh(entry, now) {
                tracing::debug!("Table cache hit for {}", path.display());
                return Ok(entry.table.clone());
            }
            tracing::debug!("Table cache entry for {} expired, reloading", path.display());
        } else {
            tracing::debug!("Table cache miss for {}", path.display());
        }

        let table = Arc::new(self.repository.load_table(path).await?);
        entries.insert(
            path.to_path_buf(),
            CachedTable {
                table: table.clone(),
                loaded_at: now,
            },
        );
        Ok(table)
    }

    fn is_fresh(&self, entry: &CachedTable, now: DateTime<Utc>) -> bool {
        match self.policy {
            CachePolicy::Session => true,
            CachePolicy::Ttl(ttl) => now - entry.loaded_at < ttl,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Repository that serves a fixed table and counts loads
    pub(crate) struct StubRepository {
        pub table: Option<Table>,
        pub loads: AtomicUsize,
    }

    impl StubRepository {
        pub(crate) fn serving(table: Table) -> Self {
            Self {
                table: Some(table),
                loads: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                table: None,
                loads: AtomicUsize::new(0),
            }
        }

        pub(crate) fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InventoryRepository for StubRepository {
        async fn load_table(&self, path: &Path) -> Result<Table, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.table.clone().ok_or_else(|| LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
        }
    }

    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn table() -> Table {
        Table::from_raw(vec!["id".into()], vec![vec!["1".into()]])
    }

    #[tokio::test]
    async fn test_session_policy_loads_once() {
        let repo = Arc::new(StubRepository::serving(table()));
        let cache = TableCache::new(repo.clone(), Arc::new(SystemClock), CachePolicy::Session);

        let first = cache.get(Path::new("data.csv")).await.unwrap();
        let second = cache.get(Path::new("data.csv")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(repo.load_count(), 1);
    }

    #[tokio::test]
    async fn test_entries_are_keyed_by_path() {
        let repo = Arc::new(StubRepository::serving(table()));
        let cache = TableCache::new(repo.clone(), Arc::new(SystemClock), CachePolicy::Session);

        cache.get(Path::new("a.csv")).await.unwrap();
        cache.get(Path::new("b.csv")).await.unwrap();
        cache.get(Path::new("a.csv")).await.unwrap();

        assert_eq!(repo.load_count(), 2);
    }

    #[tokio::test]
    async fn test_ttl_policy_reloads_after_expiry() {
        let repo = Arc::new(StubRepository::serving(table()));
        let clock = Arc::new(ManualClock(StdMutex::new(Utc::now())));
        let cache = TableCache::new(
            repo.clone(),
            clock.clone(),
            CachePolicy::from_ttl(Some(Duration::seconds(60))),
        );
        let path = Path::new("data.csv");

        cache.get(path).await.unwrap();
        clock.advance(Duration::seconds(30));
        cache.get(path).await.unwrap();
        assert_eq!(repo.load_count(), 1);

        clock.advance(Duration::seconds(31));
        cache.get(path).await.unwrap();
        assert_eq!(repo.load_count(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let repo = Arc::new(StubRepository::failing());
        let cache = TableCache::new(repo.clone(), Arc::new(SystemClock), CachePolicy::Session);

        assert!(cache.get(Path::new("missing.csv")).await.is_err());
        assert!(cache.get(Path::new("missing.csv")).await.is_err());
        assert_eq!(repo.load_count(), 2);
    }
}
