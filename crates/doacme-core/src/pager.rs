//! Lazy record listing
//!
//! Turns the page-at-a-time [`RecordStore::list_records`] call into a single
//! stream of records. A page is requested only once the previous one has been
//! consumed, so a caller that stops early never pays for the remaining pages.
//!
//! The stream is finite and not restartable: each page is a fresh remote call.
//! The first listing error is yielded once and ends the stream.

use crate::record::RemoteRecord;
use crate::traits::{PageToken, RecordStore};
use crate::{Error, Result};
use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

/// Stream every record for `domain`, in provider order, across all pages
pub fn records<'a>(
    store: &'a dyn RecordStore,
    domain: &'a str,
) -> impl Stream<Item = Result<RemoteRecord>> + Send + 'a {
    pages(store, domain)
        .map_ok(|records| stream::iter(records.into_iter().map(Ok::<_, Error>)))
        .try_flatten()
}

/// Stream the record pages for `domain`, one remote call per item
pub fn pages<'a>(
    store: &'a dyn RecordStore,
    domain: &'a str,
) -> impl Stream<Item = Result<Vec<RemoteRecord>>> + Send + 'a {
    // `None` once the last page has been fetched
    let start: Option<Option<PageToken>> = Some(None);

    stream::try_unfold(start, move |cursor| async move {
        let Some(token) = cursor else {
            return Ok(None);
        };

        debug!(
            "Listing {} records for {} (page: {})",
            store.store_name(),
            domain,
            token.as_ref().map_or("first", PageToken::as_str)
        );
        let page = store.list_records(domain, token).await?;
        debug!("Fetched {} record(s), more: {}", page.records.len(), page.next.is_some());

        Ok::<_, Error>(Some((page.records, page.next.map(Some))))
    })
}
