//! Core traits for doacme
//!
//! This module defines the abstract interface that record stores must follow.
//!
//! - [`RecordStore`]: List, create, edit and delete records via a provider API

pub mod record_store;

pub use record_store::{PageToken, RecordPage, RecordRequest, RecordStore};
