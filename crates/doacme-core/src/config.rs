//! Configuration types for doacme
//!
//! This module defines the configuration consumed by the reconciler and the
//! checks that run before any remote call is made.

use crate::record::{DesiredRecord, DEFAULT_TTL};
use serde::{Deserialize, Serialize};

/// Main doacme configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DoacmeConfig {
    /// Fully-qualified domain the record lives under (e.g. "www.example.com")
    pub domain: String,

    /// Provider API token
    /// ⚠️ NEVER log this value
    pub token: String,

    /// The record to reconcile
    pub record: RecordConfig,

    /// What the invocation is allowed to do
    #[serde(default)]
    pub intents: Intents,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DoacmeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoacmeConfig")
            .field("domain", &self.domain)
            .field("token", &"<REDACTED>")
            .field("record", &self.record)
            .field("intents", &self.intents)
            .finish()
    }
}

impl DoacmeConfig {
    /// Create a new configuration with default record settings and no intents
    pub fn new(
        domain: impl Into<String>,
        token: impl Into<String>,
        record: RecordConfig,
    ) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            record,
            intents: Intents::default(),
        }
    }

    /// Set the intents
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    /// Validate the configuration
    ///
    /// Runs the required-field rules in order, then checks the domain shape
    /// and intent exclusivity. Nothing here touches the network.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let writing = self.intents.wants_write();

        for rule in FIELD_RULES {
            let required = match rule.requirement {
                Requirement::Always => true,
                Requirement::ForWrites => writing,
            };
            if required && (rule.value)(self).trim().is_empty() {
                return Err(crate::Error::config(format!("{} is required", rule.name)));
            }
        }

        let labels = self.labels();
        if labels.iter().any(|label| label.is_empty()) {
            return Err(crate::Error::config(format!(
                "Domain has an empty label: {}",
                self.domain
            )));
        }
        if labels.len() < 2 {
            return Err(crate::Error::config(format!(
                "Domain must have at least two labels: {}",
                self.domain
            )));
        }

        self.intents.validate()?;

        if writing && self.record.ttl == 0 {
            return Err(crate::Error::config("RecordTTL must be greater than 0"));
        }

        Ok(())
    }

    /// The registrable domain the records are hosted under
    ///
    /// `"www.example.com"` → `"example.com"`
    pub fn tld(&self) -> String {
        let parts = self.labels();
        if parts.len() < 2 {
            return parts.join(".");
        }
        parts[parts.len() - 2..].join(".")
    }

    /// The labels in front of the top-level domain, possibly empty
    ///
    /// `"a.b.example.com"` → `"a.b"`
    pub fn sub_domain(&self) -> String {
        let parts = self.labels();
        if parts.len() <= 2 {
            return String::new();
        }
        parts[..parts.len() - 2].join(".")
    }

    /// Domain labels, ignoring the root dot of a fully-qualified name
    fn labels(&self) -> Vec<&str> {
        let domain = self.domain.trim();
        let domain = domain.strip_suffix('.').unwrap_or(domain);
        domain.split('.').collect()
    }

    /// Build the desired record, qualifying its name with the sub-domain
    pub fn desired_record(&self) -> DesiredRecord {
        let sub_domain = self.sub_domain();
        let name = if sub_domain.is_empty() {
            self.record.name.clone()
        } else {
            format!("{}.{}", self.record.name, sub_domain)
        };

        DesiredRecord {
            record_type: self.record.record_type.clone(),
            name,
            data: self.record.data.clone().filter(|data| !data.is_empty()),
            ttl: self.record.ttl,
            priority: self.record.priority,
            port: self.record.port,
            weight: self.record.weight,
        }
    }
}

/// Whether a field must be non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    /// Always required
    Always,
    /// Required when create or update is requested
    ForWrites,
}

/// A single required-field check
struct FieldRule {
    name: &'static str,
    value: fn(&DoacmeConfig) -> &str,
    requirement: Requirement,
}

/// Required-field rules, evaluated in order
const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "Domain",
        value: field_domain,
        requirement: Requirement::Always,
    },
    FieldRule {
        name: "Token",
        value: field_token,
        requirement: Requirement::Always,
    },
    FieldRule {
        name: "RecordType",
        value: field_record_type,
        requirement: Requirement::Always,
    },
    FieldRule {
        name: "RecordName",
        value: field_record_name,
        requirement: Requirement::Always,
    },
    FieldRule {
        name: "RecordData",
        value: field_record_data,
        requirement: Requirement::ForWrites,
    },
];

fn field_domain(config: &DoacmeConfig) -> &str {
    &config.domain
}

fn field_token(config: &DoacmeConfig) -> &str {
    &config.token
}

fn field_record_type(config: &DoacmeConfig) -> &str {
    &config.record.record_type
}

fn field_record_name(config: &DoacmeConfig) -> &str {
    &config.record.name
}

fn field_record_data(config: &DoacmeConfig) -> &str {
    config.record.data.as_deref().unwrap_or_default()
}

/// DNS record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Record type (e.g. "A", "TXT", "MX")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record name relative to the sub-domain (e.g. "_acme-challenge")
    pub name: String,

    /// Record data; required for create and update
    #[serde(default)]
    pub data: Option<String>,

    /// Time-to-live in seconds
    #[serde(default = "default_ttl")]
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

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(record_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            data: None,
            ttl: default_ttl(),
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
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

/// The operations an invocation may perform
///
/// With no intent set, the invocation only reports: absent records are not
/// created and present records are not updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    /// Remove the record if it exists
    #[serde(default)]
    pub delete: bool,
    /// Create the record if it does not exist
    #[serde(default)]
    pub create: bool,
    /// Update the record if it exists with different data
    #[serde(default)]
    pub update: bool,
    /// Only report the record's current state
    #[serde(default)]
    pub read: bool,
}

impl Intents {
    /// Create or update, the usual "ensure present" invocation
    pub fn upsert() -> Self {
        Self {
            create: true,
            update: true,
            ..Self::default()
        }
    }

    /// Delete only
    pub fn delete() -> Self {
        Self {
            delete: true,
            ..Self::default()
        }
    }

    /// Read only
    pub fn read() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }

    /// Whether create or update is requested
    pub fn wants_write(&self) -> bool {
        self.create || self.update
    }

    /// Reject combinations that cannot be honored in a single invocation
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.delete && self.wants_write() {
            return Err(crate::Error::config(
                "Can't delete and create/update at the same time",
            ));
        }
        if self.read && (self.delete || self.wants_write()) {
            return Err(crate::Error::config(
                "Can't read and delete/create/update at the same time",
            ));
        }
        Ok(())
    }
}
