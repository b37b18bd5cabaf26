use async_trait::async_trait;

use crate::error::AppError;

/// A stored object as the blob store reports it: its key plus the resolved
/// publicly fetchable URL.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// The contract this service consumes from the external object store.
/// The S3 adapter is the production implementation; tests swap in an
/// in-memory one.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object with public-read access, returning its resolved URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    /// List every object whose key starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, AppError>;

    /// Fetch an object's bytes by key.
    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError>;

    /// Delete a batch of objects in a single request.
    async fn delete(&self, keys: &[String]) -> Result<(), AppError>;
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory BlobStore for tests. Records how many put calls were made
    /// so tests can assert that failed operations wrote nothing.
    #[derive(Default)]
    pub struct MemoryBlobStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
        puts: AtomicUsize,
    }

    impl MemoryBlobStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn put_count(&self) -> usize {
            self.puts.load(Ordering::SeqCst)
        }

        /// Seed an object directly, bypassing the put counter.
        pub fn seed(&self, key: &str, bytes: Vec<u8>) {
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
        }

        pub fn contains(&self, key: &str) -> bool {
            self.objects.lock().unwrap().contains_key(key)
        }

        fn url_for(key: &str) -> String {
            format!("memory://test-bucket/{}", key)
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn put(
            &self,
            key: &str,
            bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<StoredObject, AppError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
            Ok(StoredObject {
                key: key.to_string(),
                url: Self::url_for(key),
            })
        }

        async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, AppError> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .map(|k| StoredObject {
                    key: k.clone(),
                    url: Self::url_for(k),
                })
                .collect())
        }

        async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| {
                    AppError::StorageUnavailable(format!("object `{}` missing", key))
                })
        }

        async fn delete(&self, keys: &[String]) -> Result<(), AppError> {
            let mut objects = self.objects.lock().unwrap();
            for key in keys {
                objects.remove(key);
            }
            Ok(())
        }
    }
}
