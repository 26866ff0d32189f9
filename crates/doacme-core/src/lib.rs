// # doacme-core
//
// Core library for reconciling a single DNS record against a provider's
// record-management API.
//
// ## Architecture Overview
//
// - **RecordStore**: Trait for listing and mutating records via a provider API
// - **matcher**: Identity (type + name) and full equality between records
// - **pager**: Lazy stream of records across listing pages
// - **Reconciler**: Chooses and performs exactly one of create, update,
//   delete, read or no-op
// - **report**: One-line summary of the outcome
//
// ## Design Principles
//
// 1. **Single mutation**: One invocation performs at most one write
// 2. **Idempotency**: A record that already matches is never written
// 3. **No hidden retries**: Store errors surface unchanged
// 4. **Library-First**: The binary is a thin layer over this crate

pub mod traits;
pub mod record;
pub mod matcher;
pub mod pager;
pub mod reconciler;
pub mod report;
pub mod config;
pub mod error;
pub mod store;

// Re-export core types for convenience
pub use traits::RecordStore;
pub use record::{DesiredRecord, RemoteRecord};
pub use reconciler::{Action, Outcome, Reconciler, UPDATE_TIMEOUT};
pub use config::{DoacmeConfig, Intents, RecordConfig};
pub use error::{Error, Result};
pub use store::MemoryRecordStore;
