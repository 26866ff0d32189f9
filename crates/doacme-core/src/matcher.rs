//! Record matching
//!
//! Two equality relations are used during reconciliation:
//!
//! - [`is_same_identity`]: type + name. Locates "the" record for a desired
//!   type/name pair regardless of its current data.
//! - [`is_fully_equal`]: identity plus data, TTL, priority, port and weight.
//!   Decides whether a write can be skipped. The first argument is the
//!   desired record: an optional field it leaves unset is not compared,
//!   since the write payload omits it and the store keeps its value.
//!
//! Full equality always implies identity equality.

use crate::record::{DesiredRecord, RemoteRecord};

/// Field accessors shared by desired and remote records
pub trait RecordFields {
    /// Record type
    fn record_type(&self) -> &str;
    /// Record name
    fn name(&self) -> &str;
    /// Record data
    fn data(&self) -> &str;
    /// Time-to-live in seconds
    fn ttl(&self) -> u32;
    /// MX/SRV priority
    fn priority(&self) -> Option<u32>;
    /// SRV port
    fn port(&self) -> Option<u32>;
    /// SRV weight
    fn weight(&self) -> Option<u32>;
}

impl RecordFields for DesiredRecord {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> &str {
        self.data_or_empty()
    }

    fn ttl(&self) -> u32 {
        self.ttl
    }

    fn priority(&self) -> Option<u32> {
        self.priority
    }

    fn port(&self) -> Option<u32> {
        self.port
    }

    fn weight(&self) -> Option<u32> {
        self.weight
    }
}

impl RecordFields for RemoteRecord {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> &str {
        &self.data
    }

    fn ttl(&self) -> u32 {
        self.ttl
    }

    fn priority(&self) -> Option<u32> {
        self.priority
    }

    fn port(&self) -> Option<u32> {
        self.port
    }

    fn weight(&self) -> Option<u32> {
        self.weight
    }
}

/// True iff both records have the same type and name
pub fn is_same_identity(a: &impl RecordFields, b: &impl RecordFields) -> bool {
    a.record_type() == b.record_type() && a.name() == b.name()
}

/// True iff identity, data, TTL and the optional provider fields all match
///
/// Optional fields are only compared when `desired` sets them; an unset
/// field on `current` equals the provider's zero sentinel.
pub fn is_fully_equal(desired: &impl RecordFields, current: &impl RecordFields) -> bool {
    is_same_identity(desired, current)
        && desired.data() == current.data()
        && desired.ttl() == current.ttl()
        && optional_eq(desired.priority(), current.priority())
        && optional_eq(desired.port(), current.port())
        && optional_eq(desired.weight(), current.weight())
}

fn optional_eq(desired: Option<u32>, current: Option<u32>) -> bool {
    match desired {
        None => true,
        Some(value) => value == current.unwrap_or(0),
    }
}
