//! Record reconciler
//!
//! The Reconciler is responsible for:
//! - Locating the record matching the desired type and name
//! - Choosing exactly one of create, update, delete, read or no-op
//! - Performing that single mutation, with a deadline on updates
//!
//! ## Decision Flow
//!
//! ```text
//!                    ┌──────────────┐
//!                    │ find_record  │ (paged lookup, first identity match)
//!                    └──────────────┘
//!                           │
//!       ┌───────────────────┼────────────────────────┐
//!       ▼                   ▼                        ▼
//!    read?               delete?               create / update
//!  found → Read      absent → NoOp        absent → Create (if allowed)
//!  absent → error    found  → Delete      found, equal → NoOp
//!                                         found, differs → Update (10s)
//! ```
//!
//! Intents are validated when the reconciler is built, so conflicting
//! requests never reach the store.

use crate::config::{DoacmeConfig, Intents};
use crate::error::{Error, Result};
use crate::matcher::{is_fully_equal, is_same_identity};
use crate::pager;
use crate::record::{DesiredRecord, RemoteRecord};
use crate::traits::RecordStore;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Deadline for the update call
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// The kind of change an invocation made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Record was created
    Create,
    /// Record was updated in place
    Update,
    /// Record was deleted
    Delete,
    /// Nothing needed to change
    NoOp,
    /// Record was only read
    Read,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Delete => "Delete",
            Action::NoOp => "NoOp",
            Action::Read => "Read",
        };
        f.write_str(name)
    }
}

/// Result of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Record did not exist and was created
    Created(RemoteRecord),

    /// Record existed with different data and was updated
    Updated {
        /// The record before the edit
        previous: RemoteRecord,
        /// The record as returned by the store after the edit
        current: RemoteRecord,
    },

    /// Record existed and was deleted
    Deleted(RemoteRecord),

    /// Record already matched the desired state; no write was issued
    Unchanged(RemoteRecord),

    /// Delete requested but no matching record exists
    NothingToDelete(DesiredRecord),

    /// Record was read without modification
    Read(RemoteRecord),
}

impl Outcome {
    /// The action tag handed to the reporter
    pub fn action(&self) -> Action {
        match self {
            Outcome::Created(_) => Action::Create,
            Outcome::Updated { .. } => Action::Update,
            Outcome::Deleted(_) => Action::Delete,
            Outcome::Unchanged(_) | Outcome::NothingToDelete(_) => Action::NoOp,
            Outcome::Read(_) => Action::Read,
        }
    }

    /// Whether the store was left untouched
    pub fn is_noop(&self) -> bool {
        matches!(self.action(), Action::NoOp | Action::Read)
    }
}

/// Single-record reconciler
///
/// Built once per invocation from a validated configuration and a record
/// store; holds no state besides them.
pub struct Reconciler {
    /// Store holding the current records
    store: Box<dyn RecordStore>,

    /// Top-level domain the record lives under
    domain: String,

    /// Target record
    desired: DesiredRecord,

    /// Allowed operations
    intents: Intents,

    /// Deadline for the update call
    update_timeout: Duration,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `store`: Record store implementation
    /// - `config`: doacme configuration
    ///
    /// # Returns
    ///
    /// `Err(Error::Config)` if the configuration is invalid; no remote call
    /// is made in that case.
    pub fn new(store: Box<dyn RecordStore>, config: &DoacmeConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            domain: config.tld(),
            desired: config.desired_record(),
            intents: config.intents,
            update_timeout: UPDATE_TIMEOUT,
        })
    }

    /// Override the update deadline
    pub fn with_update_timeout(mut self, timeout: Duration) -> Self {
        self.update_timeout = timeout;
        self
    }

    /// The top-level domain being reconciled
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The desired record
    pub fn desired(&self) -> &DesiredRecord {
        &self.desired
    }

    /// Find the first record with the desired type and name
    ///
    /// Pages are fetched lazily and in order; the scan stops at the first
    /// match. Listing errors are returned unchanged.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: The first identity match in provider order
    /// - `Ok(None)`: No record matched after all pages were read
    pub async fn find_record(&self) -> Result<Option<RemoteRecord>> {
        debug!(
            "Looking up {} record {} in {}",
            self.desired.record_type, self.desired.name, self.domain
        );

        let mut records = std::pin::pin!(pager::records(self.store.as_ref(), &self.domain));
        while let Some(candidate) = records.try_next().await? {
            if is_same_identity(&self.desired, &candidate) {
                if candidate.id.is_empty() {
                    return Err(Error::provider(
                        self.store.store_name(),
                        format!("record {} has no identifier", candidate.name),
                    ));
                }
                debug!("Found record {} (id: {})", candidate.name, candidate.id);
                return Ok(Some(candidate));
            }
        }

        debug!("No {} record {} in {}", self.desired.record_type, self.desired.name, self.domain);
        Ok(None)
    }

    /// Run the reconciliation
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome)`: The single action taken (or skipped)
    /// - `Err(Error)`: Lookup failure, missing record on read, disabled
    ///   operation, or failed mutation
    pub async fn run(&self) -> Result<Outcome> {
        let found = self.find_record().await?;

        if self.intents.read {
            return self.read(found);
        }

        if self.intents.delete {
            return self.delete(found).await;
        }

        match found {
            None => self.create().await,
            Some(current) => self.update(current).await,
        }
    }

    fn read(&self, found: Option<RemoteRecord>) -> Result<Outcome> {
        match found {
            Some(record) => Ok(Outcome::Read(record)),
            None => Err(Error::not_found(format!(
                "{} record {} in {}",
                self.desired.record_type, self.desired.name, self.domain
            ))),
        }
    }

    async fn delete(&self, found: Option<RemoteRecord>) -> Result<Outcome> {
        let Some(record) = found else {
            warn!("Can't delete record {}, does not exist", self.desired.name);
            return Ok(Outcome::NothingToDelete(self.desired.clone()));
        };

        info!("Deleting record {} (id: {}) in {}", record.name, record.id, self.domain);
        self.store
            .delete_record(&self.domain, &record.id)
            .await
            .map_err(|e| Error::mutation(Action::Delete, e))?;

        info!("Record deleted: {}", record.name);
        Ok(Outcome::Deleted(record))
    }

    async fn create(&self) -> Result<Outcome> {
        if !self.intents.create {
            return Err(Error::permission(format!(
                "record {} does not exist and creation is disabled",
                self.desired.name
            )));
        }

        let request = self.desired.to_request()?;
        info!(
            "Creating {} record {} -> {} in {}",
            request.record_type, request.name, request.data, self.domain
        );

        let created = self
            .store
            .create_record(&self.domain, &request)
            .await
            .map_err(|e| Error::mutation(Action::Create, e))?;

        info!("Record created: {} (id: {})", created.name, created.id);
        Ok(Outcome::Created(created))
    }

    async fn update(&self, current: RemoteRecord) -> Result<Outcome> {
        if !self.intents.update {
            return Err(Error::permission(format!(
                "record {} exists and update is disabled",
                current.name
            )));
        }

        if is_fully_equal(&self.desired, &current) {
            debug!("Record {} already up to date, skipping update", current.name);
            return Ok(Outcome::Unchanged(current));
        }

        let request = self.desired.to_request()?;
        info!(
            "Updating record {} (id: {}) -> {} (was: {})",
            current.name, current.id, request.data, current.data
        );

        let edited = tokio::time::timeout(
            self.update_timeout,
            self.store.edit_record(&self.domain, &current.id, &request),
        )
        .await
        .map_err(|_| Error::Timeout {
            action: Action::Update,
            after: self.update_timeout,
        })?
        .map_err(|e| Error::mutation(Action::Update, e))?;

        info!("Record updated: {} (id: {})", edited.name, edited.id);
        Ok(Outcome::Updated {
            previous: current,
            current: edited,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordConfig;
    use crate::store::MemoryRecordStore;

    fn config(intents: Intents) -> DoacmeConfig {
        DoacmeConfig::new(
            "example.com",
            "token",
            RecordConfig::new("TXT", "_acme-challenge")
                .with_data("abc123")
                .with_ttl(300),
        )
        .with_intents(intents)
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Create.to_string(), "Create");
        assert_eq!(Action::NoOp.to_string(), "NoOp");
    }

    #[test]
    fn test_outcome_actions() {
        let desired = DesiredRecord::new("TXT", "x");
        assert_eq!(Outcome::NothingToDelete(desired).action(), Action::NoOp);
    }

    #[test]
    fn test_conflicting_intents_rejected_at_construction() {
        let store = MemoryRecordStore::new();
        let intents = Intents {
            delete: true,
            create: true,
            ..Intents::default()
        };

        let result = Reconciler::new(Box::new(store), &config(intents));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_create_then_noop() {
        let store = MemoryRecordStore::new();
        let reconciler = Reconciler::new(Box::new(store.clone()), &config(Intents::upsert())).unwrap();

        let first = reconciler.run().await.unwrap();
        assert_eq!(first.action(), Action::Create);
        assert_eq!(store.len("example.com").await, 1);

        let second = reconciler.run().await.unwrap();
        assert_eq!(second.action(), Action::NoOp);
        assert!(matches!(second, Outcome::Unchanged(_)));
    }

    #[tokio::test]
    async fn test_disabled_create_is_permission_error() {
        let reconciler =
            Reconciler::new(Box::new(MemoryRecordStore::new()), &config(Intents::default())).unwrap();

        let err = reconciler.run().await.unwrap_err();
        assert!(matches!(err, Error::Permission(_)));
        assert!(err.to_string().contains("creation is disabled"));
    }

    #[tokio::test]
    async fn test_read_absent_is_not_found() {
        let reconciler =
            Reconciler::new(Box::new(MemoryRecordStore::new()), &config(Intents::read())).unwrap();

        assert!(matches!(reconciler.run().await, Err(Error::NotFound(_))));
    }
}
