// # Record Store Trait
//
// Defines the interface for reading and writing DNS records through a
// provider's record-management API.
//
// ## Implementations
//
// - DigitalOcean: `doacme-provider-digitalocean` crate
// - In-memory: `doacme_core::store::MemoryRecordStore`
//
// ## Usage
//
// ```rust,ignore
// use doacme_core::RecordStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* RecordStore implementation */;
//
//     // Fetch the first page of records for a domain
//     let page = store.list_records("example.com", None).await?;
//     for record in &page.records {
//         println!("{} {} {}", record.record_type, record.name, record.data);
//     }
//
//     Ok(())
// }
// ```

use crate::record::RemoteRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque cursor pointing at the next page of a listing
///
/// Only the store that produced a token knows how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    /// Wrap a provider-specific cursor
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw cursor value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a record listing
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    /// Records in provider order
    pub records: Vec<RemoteRecord>,
    /// Cursor for the following page, `None` on the last page
    pub next: Option<PageToken>,
}

/// Payload for create and edit calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record name relative to the top-level domain
    pub name: String,
    /// Record data
    pub data: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// MX/SRV priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// SRV port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    /// SRV weight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// Trait for record store implementations
///
/// A record store is a thin adapter over a provider's API, keyed by
/// top-level domain and record identifier.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Responsibilities
///
/// Stores execute exactly one remote operation per call and report the
/// result. They must NOT:
/// - retry or back off (a failed call is surfaced to the caller unchanged)
/// - decide whether a write is needed (owned by `Reconciler`)
/// - cache records between calls
/// - impose their own deadline on `edit_record` (the caller wraps it)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List one page of records for `domain`
    ///
    /// # Parameters
    ///
    /// - `domain`: The top-level domain (e.g., "example.com")
    /// - `page`: `None` for the first page, otherwise the token returned
    ///   with the previous page
    ///
    /// # Returns
    ///
    /// - `Ok(RecordPage)`: Records in provider order plus the next-page cursor
    /// - `Err(Error)`: If the listing request failed
    async fn list_records(
        &self,
        domain: &str,
        page: Option<PageToken>,
    ) -> Result<RecordPage, crate::Error>;

    /// Create a new record under `domain`
    ///
    /// # Returns
    ///
    /// The record as stored by the provider, including its new identifier
    async fn create_record(
        &self,
        domain: &str,
        request: &RecordRequest,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Replace the record `record_id` under `domain`
    ///
    /// # Returns
    ///
    /// The record as stored by the provider after the edit
    async fn edit_record(
        &self,
        domain: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Delete the record `record_id` under `domain`
    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Get the store name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the store (e.g., "digitalocean", "memory")
    fn store_name(&self) -> &'static str;
}
