//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles wrap an in-memory store and count every call, so tests can
//! assert exactly which remote operations a reconciliation issued.

#![allow(dead_code)]

use doacme_core::error::{Error, Result};
use doacme_core::traits::{PageToken, RecordPage, RecordRequest, RecordStore};
use doacme_core::{DoacmeConfig, Intents, MemoryRecordStore, RecordConfig, RemoteRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shared call counters
#[derive(Debug, Default)]
pub struct CallCounts {
    list: AtomicUsize,
    create: AtomicUsize,
    edit: AtomicUsize,
    delete: AtomicUsize,
}

impl CallCounts {
    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn create(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn edit(&self) -> usize {
        self.edit.load(Ordering::SeqCst)
    }

    pub fn delete(&self) -> usize {
        self.delete.load(Ordering::SeqCst)
    }

    /// Total number of mutating calls
    pub fn writes(&self) -> usize {
        self.create() + self.edit() + self.delete()
    }

    /// Total number of calls of any kind
    pub fn total(&self) -> usize {
        self.list() + self.writes()
    }
}

/// How the counting store behaves on mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Delegate to the in-memory store
    Normal,
    /// Every listing call fails
    FailList,
    /// Every mutating call fails
    FailWrites,
    /// `edit_record` never completes within the test
    HangEdit,
}

/// A RecordStore that counts calls and delegates to a MemoryRecordStore
pub struct CountingStore {
    inner: MemoryRecordStore,
    counts: Arc<CallCounts>,
    mode: Mode,
}

impl CountingStore {
    pub fn new(inner: MemoryRecordStore) -> Self {
        Self::with_mode(inner, Mode::Normal)
    }

    pub fn with_mode(inner: MemoryRecordStore, mode: Mode) -> Self {
        Self {
            inner,
            counts: Arc::new(CallCounts::default()),
            mode,
        }
    }

    /// Handle to the counters that outlives the boxed store
    pub fn counts(&self) -> Arc<CallCounts> {
        Arc::clone(&self.counts)
    }

    fn write_guard(&self) -> Result<()> {
        if self.mode == Mode::FailWrites {
            return Err(Error::provider("counting", "HTTP 500: internal error"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for CountingStore {
    async fn list_records(&self, domain: &str, page: Option<PageToken>) -> Result<RecordPage> {
        self.counts.list.fetch_add(1, Ordering::SeqCst);
        if self.mode == Mode::FailList {
            return Err(Error::http("connection refused"));
        }
        self.inner.list_records(domain, page).await
    }

    async fn create_record(&self, domain: &str, request: &RecordRequest) -> Result<RemoteRecord> {
        self.counts.create.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;
        self.inner.create_record(domain, request).await
    }

    async fn edit_record(
        &self,
        domain: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<RemoteRecord> {
        self.counts.edit.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;
        if self.mode == Mode::HangEdit {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.inner.edit_record(domain, record_id, request).await
    }

    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        self.counts.delete.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;
        self.inner.delete_record(domain, record_id).await
    }

    fn store_name(&self) -> &'static str {
        "counting"
    }
}

/// Build a remote record
pub fn remote(id: &str, record_type: &str, name: &str, data: &str, ttl: u32) -> RemoteRecord {
    RemoteRecord {
        id: id.to_string(),
        record_type: record_type.to_string(),
        name: name.to_string(),
        data: data.to_string(),
        ttl,
        priority: None,
        port: None,
        weight: None,
    }
}

/// Configuration for the ACME challenge record used across scenarios
pub fn acme_config(intents: Intents) -> DoacmeConfig {
    DoacmeConfig::new(
        "example.com",
        "test-token",
        RecordConfig::new("TXT", "_acme-challenge")
            .with_data("abc123")
            .with_ttl(300),
    )
    .with_intents(intents)
}

/// Seed `records` into a fresh store with the given page size
pub async fn seeded_store(page_size: usize, records: Vec<RemoteRecord>) -> MemoryRecordStore {
    let store = MemoryRecordStore::with_page_size(page_size);
    for record in records {
        store.insert("example.com", record).await;
    }
    store
}
