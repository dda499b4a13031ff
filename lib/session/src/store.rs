use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use resumerank_core::{Error, Result, Table};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Opaque token identifying one ranked result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultHandle(Uuid);

impl ResultHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResultHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResultHandle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::ResultNotFound(s.to_string()))
    }
}

/// A full ranked table kept for later download
#[derive(Debug, Clone)]
pub struct StoredResult {
    pub handle: ResultHandle,
    pub created_at: DateTime<Utc>,
    pub table: Table,
}

impl StoredResult {
    pub fn to_csv(&self) -> Result<String> {
        self.table.to_csv_string()
    }
}

#[derive(Default)]
struct StoreInner {
    results: AHashMap<ResultHandle, Arc<StoredResult>>,
    // Insertion order, oldest first
    order: VecDeque<ResultHandle>,
}

/// Bounded, in-memory store of ranked tables
///
/// `latest` is last-write-wins: with concurrent writers it returns whichever
/// insert took the lock last. Callers that need the table of their own
/// ranking call use the handle.
pub struct ResultStore {
    inner: RwLock<StoreInner>,
    capacity: usize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Store a table, evicting the oldest entries beyond capacity
    pub fn insert(&self, table: Table) -> Arc<StoredResult> {
        let stored = Arc::new(StoredResult {
            handle: ResultHandle::new(),
            created_at: Utc::now(),
            table,
        });

        let mut inner = self.inner.write();
        inner.results.insert(stored.handle, stored.clone());
        inner.order.push_back(stored.handle);
        while inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.results.remove(&evicted);
                debug!("Evicted ranked result {}", evicted);
            }
        }

        stored
    }

    pub fn get(&self, handle: &ResultHandle) -> Result<Arc<StoredResult>> {
        self.inner
            .read()
            .results
            .get(handle)
            .cloned()
            .ok_or_else(|| Error::ResultNotFound(handle.to_string()))
    }

    /// Most recently stored result
    pub fn latest(&self) -> Result<Arc<StoredResult>> {
        let inner = self.inner.read();
        inner
            .order
            .back()
            .and_then(|handle| inner.results.get(handle))
            .cloned()
            .ok_or(Error::NoPriorResult)
    }

    pub fn len(&self) -> usize {
        self.inner.read().results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
