//! Record value types
//!
//! - [`DesiredRecord`]: the record the caller wants to exist
//! - [`RemoteRecord`]: a snapshot of a record held by the store

use crate::traits::RecordRequest;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default TTL applied when none is configured
pub const DEFAULT_TTL: u32 = 3600;

/// The target state of a single DNS record
///
/// Built once from configuration and never mutated during an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Record type (e.g. "A", "TXT", "MX")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record name relative to the top-level domain
    pub name: String,

    /// Record data; only required when writing
    pub data: Option<String>,

    /// Time-to-live in seconds
    pub ttl: u32,

    /// MX/SRV priority
    pub priority: Option<u32>,

    /// SRV port
    pub port: Option<u32>,

    /// SRV weight
    pub weight: Option<u32>,
}

impl DesiredRecord {
    /// Create a desired record with the default TTL and no data
    pub fn new(record_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            data: None,
            ttl: DEFAULT_TTL,
            priority: None,
            port: None,
            weight: None,
        }
    }

    /// Set the record data
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u32) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Record data, or an empty string for lookup-only records
    pub fn data_or_empty(&self) -> &str {
        self.data.as_deref().unwrap_or_default()
    }

    /// Build the write payload for create and edit calls
    ///
    /// Fails if the record has no data or a zero TTL.
    pub fn to_request(&self) -> Result<RecordRequest> {
        let data = match self.data.as_deref() {
            Some(data) if !data.is_empty() => data.to_string(),
            _ => return Err(Error::config("RecordData is required")),
        };
        if self.ttl == 0 {
            return Err(Error::config("RecordTTL must be greater than 0"));
        }

        Ok(RecordRequest {
            record_type: self.record_type.clone(),
            name: self.name.clone(),
            data,
            ttl: self.ttl,
            priority: self.priority,
            port: self.port,
            weight: self.weight,
        })
    }
}

/// A record as currently held by the store
///
/// Fetched fresh on every invocation and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Provider-assigned identifier; never empty
    pub id: String,

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
    #[serde(default)]
    pub priority: Option<u32>,

    /// SRV port
    #[serde(default)]
    pub port: Option<u32>,

    /// SRV weight
    #[serde(default)]
    pub weight: Option<u32>,
}

impl RemoteRecord {
    /// Materialize a record from a write payload and an assigned id
    pub fn from_request(id: impl Into<String>, request: &RecordRequest) -> Self {
        Self {
            id: id.into(),
            record_type: request.record_type.clone(),
            name: request.name.clone(),
            data: request.data.clone(),
            ttl: request.ttl,
            priority: request.priority,
            port: request.port,
            weight: request.weight,
        }
    }
}
