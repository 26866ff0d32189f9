// # Memory Record Store
//
// In-memory implementation of RecordStore.
//
// ## Purpose
//
// Holds records per domain in a HashMap so the reconciler can be exercised
// without a provider account: tests, local experiments, and embedding.
//
// ## Behavior
//
// - Listing is paginated with a configurable page size; the page token is
//   the offset of the next record
// - Records keep insertion order; edits keep the record in place
// - Identifiers are assigned sequentially starting at 1
// - Nothing survives the process

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::record::RemoteRecord;
use crate::traits::{PageToken, RecordPage, RecordRequest, RecordStore};
use crate::Error;

/// Page size used by [`MemoryRecordStore::new`]
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Default)]
struct Inner {
    domains: HashMap<String, Vec<RemoteRecord>>,
    last_id: u64,
}

impl Inner {
    fn next_id(&mut self) -> String {
        self.last_id += 1;
        self.last_id.to_string()
    }
}

/// In-memory record store implementation
///
/// This implementation stores all records in a HashMap protected by a RwLock.
/// Clones share the same records.
///
/// # Example
///
/// ```rust,no_run
/// use doacme_core::store::MemoryRecordStore;
/// use doacme_core::traits::{RecordRequest, RecordStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRecordStore::new();
///
///     let request = RecordRequest {
///         record_type: "A".to_string(),
///         name: "www".to_string(),
///         data: "192.0.2.1".to_string(),
///         ttl: 3600,
///         priority: None,
///         port: None,
///         weight: None,
///     };
///     let created = store.create_record("example.com", &request).await?;
///
///     let page = store.list_records("example.com", None).await?;
///     assert_eq!(page.records, vec![created]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<Inner>>,
    page_size: usize,
}

impl MemoryRecordStore {
    /// Create a new empty memory record store
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a new empty store returning at most `page_size` records per page
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            page_size: page_size.max(1),
        }
    }

    /// Seed a record as-is, keeping its identifier
    pub async fn insert(&self, domain: &str, record: RemoteRecord) {
        let mut guard = self.inner.write().await;
        guard
            .domains
            .entry(domain.to_string())
            .or_default()
            .push(record);
    }

    /// Snapshot of all records for `domain`
    pub async fn records(&self, domain: &str) -> Vec<RemoteRecord> {
        let guard = self.inner.read().await;
        guard.domains.get(domain).cloned().unwrap_or_default()
    }

    /// Get the number of records held for `domain`
    pub async fn len(&self, domain: &str) -> usize {
        let guard = self.inner.read().await;
        guard.domains.get(domain).map_or(0, Vec::len)
    }

    /// Check if no records are held for `domain`
    pub async fn is_empty(&self, domain: &str) -> bool {
        self.len(domain).await == 0
    }

    fn parse_offset(page: Option<PageToken>) -> Result<usize, Error> {
        match page {
            None => Ok(0),
            Some(token) => token.as_str().parse().map_err(|_| {
                Error::provider("memory", format!("Invalid page token: {}", token))
            }),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_records(
        &self,
        domain: &str,
        page: Option<PageToken>,
    ) -> Result<RecordPage, Error> {
        let offset = Self::parse_offset(page)?;
        let guard = self.inner.read().await;
        let all = guard.domains.get(domain).map(Vec::as_slice).unwrap_or_default();

        let start = offset.min(all.len());
        let end = (start + self.page_size).min(all.len());
        let next = (end < all.len()).then(|| PageToken::new(end.to_string()));

        Ok(RecordPage {
            records: all[start..end].to_vec(),
            next,
        })
    }

    async fn create_record(
        &self,
        domain: &str,
        request: &RecordRequest,
    ) -> Result<RemoteRecord, Error> {
        let mut guard = self.inner.write().await;
        let record = RemoteRecord::from_request(guard.next_id(), request);
        guard
            .domains
            .entry(domain.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn edit_record(
        &self,
        domain: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<RemoteRecord, Error> {
        let mut guard = self.inner.write().await;
        let slot = guard
            .domains
            .get_mut(domain)
            .and_then(|records| records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| Error::not_found(format!("record {} in {}", record_id, domain)))?;

        *slot = RemoteRecord::from_request(record_id, request);
        Ok(slot.clone())
    }

    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        let records = guard
            .domains
            .get_mut(domain)
            .ok_or_else(|| Error::not_found(format!("domain {}", domain)))?;

        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::not_found(format!("record {} in {}", record_id, domain)));
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
