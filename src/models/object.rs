//! Represents an object (image) stored in the remote bucket.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Characters left verbatim when a key or cursor is placed inside a URL.
/// Everything outside the unreserved set is percent-encoded.
const URL_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a key or cursor for use in a URL path or query value.
pub(crate) fn url_encode(value: &str) -> String {
    utf8_percent_encode(value, URL_KEEP).to_string()
}

/// Metadata for a single object in the bucket.
///
/// Carries what the listing page needs; the content bytes are streamed
/// separately through the store handle.
#[derive(Serialize, Clone, Debug)]
pub struct StoredObject {
    /// Object key, unique within the bucket.
    pub key: String,

    /// Direct URL of the object bytes, minted by the store adapter.
    pub url: String,

    /// Size in bytes.
    pub size: u64,

    /// Last-modified timestamp as reported by the store.
    pub last_modified: String,
}

/// One page of a bucket listing.
#[derive(Serialize, Clone, Debug)]
pub struct ListPage {
    /// Objects in listing order, at most the requested page size.
    pub items: Vec<StoredObject>,

    /// Cursor resuming the listing after this page, `None` once exhausted.
    /// The value is opaque; it round-trips through the listing URL untouched.
    pub next_cursor: Option<String>,
}
