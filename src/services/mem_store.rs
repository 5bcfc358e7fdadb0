//! In-memory [`ObjectStore`] used by tests.
//!
//! Keys list in lexicographic order and the cursor is the last key of the
//! returned page, mirroring how an S3 listing resumes after a token.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    models::object::{ListPage, StoredObject},
    services::object_store::{ByteStream, ObjectStore, StoreError, StoreResult, single_chunk},
};

#[derive(Default)]
pub struct MemStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    puts: AtomicUsize,
}

impl MemStore {
    /// Seed an object without going through `put`.
    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::copy_from_slice(bytes));
    }

    pub fn get_raw(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Number of `put` calls that reached the store.
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn entry_to_object(key: &str, bytes: &Bytes) -> StoredObject {
        StoredObject {
            key: key.to_string(),
            url: format!("mem://{key}"),
            size: bytes.len() as u64,
            last_modified: "1970-01-01T00:00:00.000Z".to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn put(&self, key: &str, mut body: ByteStream, size: u64) -> StoreResult<()> {
        let mut payload = Vec::with_capacity(size as usize);
        while let Some(chunk) = body.next().await {
            payload.extend_from_slice(&chunk?);
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from(payload));
        Ok(())
    }

    async fn item(&self, key: &str) -> StoreResult<StoredObject> {
        let objects = self.objects.lock().unwrap();
        let bytes = objects
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(Self::entry_to_object(key, bytes))
    }

    async fn open(&self, key: &str) -> StoreResult<ByteStream> {
        let bytes = self
            .get_raw(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(single_chunk(bytes))
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
        limit: usize,
    ) -> StoreResult<ListPage> {
        let objects = self.objects.lock().unwrap();
        let mut items: Vec<StoredObject> = objects
            .iter()
            .filter(|(key, _)| cursor.is_none_or(|c| key.as_str() > c))
            .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
            .take(limit + 1)
            .map(|(key, bytes)| Self::entry_to_object(key, bytes))
            .collect();

        // Fetch one extra row to learn whether a further page exists.
        let next_cursor = if items.len() > limit {
            items.truncate(limit);
            items.last().map(|obj| obj.key.clone())
        } else {
            None
        };
        Ok(ListPage { items, next_cursor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> MemStore {
        let store = MemStore::default();
        for i in 0..count {
            store.insert_raw(&format!("{}.png", 1_700_000_000 + i as u64), b"x");
        }
        store
    }

    #[tokio::test]
    async fn test_put_then_open_round_trips_bytes() {
        let store = MemStore::default();
        store
            .put("1.png", single_chunk(Bytes::from_static(b"payload")), 7)
            .await
            .unwrap();

        let mut stream = store.open("1.png").await.unwrap();
        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"payload");
        assert_eq!(store.put_calls(), 1);
    }

    #[tokio::test]
    async fn test_open_missing_key_is_not_found() {
        let store = MemStore::default();
        assert!(matches!(
            store.open("absent.png").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.item("absent.png").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_full_page_carries_cursor() {
        let store = seeded(5);
        let page = store.list(None, None, 3).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.next_cursor.as_deref(), Some("1700000002.png"));
    }

    #[tokio::test]
    async fn test_list_resumes_after_cursor_without_overlap() {
        let store = seeded(5);
        let first = store.list(None, None, 3).await.unwrap();
        let second = store
            .list(None, first.next_cursor.as_deref(), 3)
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);
        assert!(second.next_cursor.is_none());

        let first_keys: Vec<_> = first.items.iter().map(|o| o.key.clone()).collect();
        assert!(second.items.iter().all(|o| !first_keys.contains(&o.key)));
    }

    #[tokio::test]
    async fn test_list_exact_page_has_no_cursor() {
        let store = seeded(3);
        let page = store.list(None, None, 3).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_list_honors_prefix() {
        let store = MemStore::default();
        store.insert_raw("a/1.png", b"x");
        store.insert_raw("a/2.png", b"x");
        store.insert_raw("b/1.png", b"x");

        let page = store.list(Some("a/"), None, 10).await.unwrap();
        let keys: Vec<_> = page.items.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["a/1.png", "a/2.png"]);
    }
}
