//! Action summary
//!
//! Renders the one-line, tab-separated summary printed after a successful
//! invocation:
//!
//! ```text
//! <action>\t<domain>\t<type>\t<name>\t<data>\t<ttl>
//! ```

use crate::reconciler::Outcome;

/// Render the summary line for `outcome` under `domain`
pub fn summary_line(outcome: &Outcome, domain: &str) -> String {
    let (record_type, name, data, ttl) = match outcome {
        Outcome::Created(record)
        | Outcome::Deleted(record)
        | Outcome::Unchanged(record)
        | Outcome::Read(record)
        | Outcome::Updated {
            current: record, ..
        } => (
            record.record_type.as_str(),
            record.name.as_str(),
            record.data.as_str(),
            record.ttl,
        ),
        Outcome::NothingToDelete(desired) => (
            desired.record_type.as_str(),
            desired.name.as_str(),
            desired.data_or_empty(),
            desired.ttl,
        ),
    };

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        outcome.action(),
        domain,
        record_type,
        name,
        data,
        ttl
    )
}
