//! src/services/s3_store.rs
//!
//! S3Store — [`ObjectStore`] implementation backed by an S3-compatible
//! bucket via `rust-s3`. Works against AWS proper or any custom endpoint
//! (MinIO, R2); a custom endpoint switches the client to path-style
//! requests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use s3::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use tracing::debug;

use crate::{
    config::AppConfig,
    models::object::{ListPage, StoredObject, url_encode},
    services::object_store::{ByteStream, ObjectStore, StoreError, StoreResult, single_chunk},
};

/// Handle to one remote bucket. Cheap to clone and safe to share across
/// request handlers; every call performs its own HTTP round trip.
#[derive(Clone)]
pub struct S3Store {
    bucket: Bucket,
    url_base: String,
}

impl S3Store {
    /// Build a store handle from configuration. Performs no network I/O, so
    /// a bad bucket name or unreachable endpoint only surfaces on first use.
    pub fn new(cfg: &AppConfig) -> StoreResult<Self> {
        let credentials = Credentials::new(
            Some(&cfg.aws_access_key),
            Some(&cfg.aws_secret_key),
            None,
            None,
            None,
        )
        .map_err(|err| StoreError::Config(err.to_string()))?;

        let region = match &cfg.aws_endpoint {
            Some(endpoint) => Region::Custom {
                region: cfg.aws_region.clone(),
                endpoint: endpoint.trim_end_matches('/').to_string(),
            },
            None => cfg
                .aws_region
                .parse::<Region>()
                .map_err(|err| StoreError::Config(err.to_string()))?,
        };

        let mut bucket = Bucket::new(&cfg.aws_bucket, region, credentials)?;
        if cfg.aws_endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        let url_base = match &cfg.aws_endpoint {
            Some(endpoint) => {
                format!("{}/{}", endpoint.trim_end_matches('/'), cfg.aws_bucket)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                cfg.aws_bucket, cfg.aws_region
            ),
        };

        Ok(Self { bucket, url_base })
    }

    /// Public URL of an object, with the key percent-encoded.
    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_base, url_encode(key))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, mut body: ByteStream, size: u64) -> StoreResult<()> {
        let mut payload = Vec::with_capacity(size as usize);
        while let Some(chunk) = body.next().await {
            payload.extend_from_slice(&chunk?);
        }

        let response = self.bucket.put_object(key, &payload).await?;
        if response.status_code() >= 300 {
            return Err(StoreError::Status(response.status_code()));
        }
        debug!("stored object `{}` ({} bytes)", key, payload.len());
        Ok(())
    }

    async fn item(&self, key: &str) -> StoreResult<StoredObject> {
        let (head, status) = match self.bucket.head_object(key).await {
            Ok(result) => result,
            Err(S3Error::HttpFailWithBody(404, _)) => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(err) => return Err(StoreError::S3(err)),
        };
        if status == 404 {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if status >= 300 {
            return Err(StoreError::Status(status));
        }

        Ok(StoredObject {
            key: key.to_string(),
            url: self.object_url(key),
            size: head.content_length.unwrap_or(0).max(0) as u64,
            last_modified: head.last_modified.unwrap_or_default(),
        })
    }

    async fn open(&self, key: &str) -> StoreResult<ByteStream> {
        let response = match self.bucket.get_object(key).await {
            Ok(response) => response,
            Err(S3Error::HttpFailWithBody(404, _)) => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(err) => return Err(StoreError::S3(err)),
        };
        match response.status_code() {
            200..=299 => {}
            404 => return Err(StoreError::NotFound(key.to_string())),
            status => return Err(StoreError::Status(status)),
        }

        let bytes = Bytes::from(response.bytes().to_vec());
        Ok(single_chunk(bytes))
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
        limit: usize,
    ) -> StoreResult<ListPage> {
        let (result, status) = self
            .bucket
            .list_page(
                prefix.unwrap_or_default().to_string(),
                None,
                cursor.map(str::to_string),
                None,
                Some(limit),
            )
            .await?;
        if status >= 300 {
            return Err(StoreError::Status(status));
        }

        // An empty continuation token also means the listing is done.
        let next_cursor = result
            .next_continuation_token
            .filter(|token| !token.is_empty());
        let items: Vec<StoredObject> = result
            .contents
            .into_iter()
            .map(|obj| StoredObject {
                url: self.object_url(&obj.key),
                key: obj.key,
                size: obj.size as u64,
                last_modified: obj.last_modified,
            })
            .collect();

        debug!("listed {} objects (more: {})", items.len(), next_cursor.is_some());
        Ok(ListPage { items, next_cursor })
    }
}
