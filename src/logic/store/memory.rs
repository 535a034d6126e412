use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use super::{validate_key, ObjectStore, StoreError};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-process store with injectable failures
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    failing_put_prefixes: Mutex<Vec<String>>,
    /// key -> remaining transient failures for `get`
    flaky_gets: Mutex<HashMap<String, u32>>,
    put_log: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through `put`
    pub fn insert(&self, key: &str, body: impl Into<Vec<u8>>) {
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                body: body.into(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Every `put` to a key starting with `prefix` fails with a non-transient error
    pub fn fail_puts_with_prefix(&self, prefix: &str) {
        self.failing_put_prefixes.lock().push(prefix.to_string());
    }

    /// The next `times` reads of `key` fail as if the store were unavailable
    pub fn fail_gets_transiently(&self, key: &str, times: u32) {
        self.flaky_gets.lock().insert(key.to_string(), times);
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }

    /// Keys successfully written through `put`, in order
    pub fn put_log(&self) -> Vec<String> {
        self.put_log.lock().clone()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        validate_key(key)?;

        if let Some(remaining) = self.flaky_gets.lock().get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(StoreError::Unavailable(format!("injected failure for {}", key)));
            }
        }

        self.objects
            .lock()
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
        validate_key(key)?;

        if self.failing_put_prefixes.lock().iter().any(|p| key.starts_with(p.as_str())) {
            return Err(StoreError::Http {
                status: 403,
                key: key.to_string(),
            });
        }

        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        self.put_log.lock().push(key.to_string());
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.objects.lock().contains_key(key))
    }

    fn describe(&self) -> String {
        format!("memory:{} objects", self.objects.lock().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_put_failure() {
        let store = MemoryStore::new();
        store.fail_puts_with_prefix("predictions/injury_");

        assert!(store.put("predictions/injury_predictions_x.csv", b"x", "text/csv").is_err());
        assert!(store.put("predictions/latest_predictions.csv", b"x", "text/csv").is_ok());
        assert_eq!(store.put_log(), vec!["predictions/latest_predictions.csv".to_string()]);
    }

    #[test]
    fn test_flaky_get_recovers() {
        let store = MemoryStore::new();
        store.insert("models/a.json", "{}");
        store.fail_gets_transiently("models/a.json", 1);

        assert!(matches!(store.get("models/a.json"), Err(StoreError::Unavailable(_))));
        assert_eq!(store.get("models/a.json").unwrap(), b"{}");
    }
}
