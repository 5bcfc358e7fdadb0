//! Store-neutral interface to the bucket that holds uploaded images.
//!
//! Handlers talk to [`ObjectStore`] only; the S3 client lives behind it so
//! request code never sees wire-level types and tests can swap in an
//! in-memory bucket.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, stream};
use std::{io, pin::Pin};
use thiserror::Error;

use crate::models::object::{ListPage, StoredObject};

/// Payload bytes move through the store as streams of buffers.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("invalid store configuration: {0}")]
    Config(String),
    #[error("store returned status {0}")]
    Status(u16),
    #[error(transparent)]
    S3(#[from] s3::error::S3Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Wrap an already-buffered payload in the stream shape the store consumes.
pub fn single_chunk(bytes: Bytes) -> ByteStream {
    let chunk: io::Result<Bytes> = Ok(bytes);
    Box::pin(stream::iter([chunk]))
}

/// Operations the HTTP surface needs from the bucket.
///
/// Keys are plain strings; cursors are opaque tokens minted by `list` and
/// fed back verbatim on the next call.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `size` bytes under `key`, overwriting any existing object.
    async fn put(&self, key: &str, body: ByteStream, size: u64) -> StoreResult<()>;

    /// Resolve a single object's metadata by key.
    async fn item(&self, key: &str) -> StoreResult<StoredObject>;

    /// Open an object's bytes for reading.
    async fn open(&self, key: &str) -> StoreResult<ByteStream>;

    /// List one page of at most `limit` objects in stable order.
    ///
    /// `prefix` of `None` applies no filter; `cursor` of `None` starts from
    /// the beginning. The returned page carries the cursor for the next call,
    /// or `None` once the listing is exhausted.
    async fn list(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
        limit: usize,
    ) -> StoreResult<ListPage>;
}
