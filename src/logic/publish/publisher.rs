use chrono::{DateTime, Utc};
use serde::Serialize;

use super::csv::to_csv_bytes;
use crate::constants::{CSV_CONTENT_TYPE, DEFAULT_PREDICTIONS_PREFIX, LATEST_PREDICTIONS_FILE};
use crate::error::{PipelineError, PipelineResult};
use crate::logic::artifacts::version::sha256_hex;
use crate::logic::scoring::PredictionResult;
use crate::logic::store::{with_retry, ObjectStore, RetryPolicy};

/// Upper bound on `_<n>` suffixes tried for a taken timestamped key
const MAX_KEY_SUFFIX: u32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishReceipt {
    pub timestamped_key: String,
    pub latest_key: String,
    pub bytes: usize,
    /// Hex SHA-256 of the payload written under both keys
    pub digest: String,
}

/// Writes results under a timestamped key, then under the latest key
pub struct Publisher<'a> {
    store: &'a dyn ObjectStore,
    prefix: String,
    retry: RetryPolicy,
    verify: bool,
}

impl<'a> Publisher<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            prefix: DEFAULT_PREDICTIONS_PREFIX.to_string(),
            retry: RetryPolicy::default(),
            verify: false,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.trim_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Read the timestamped object back and compare digests before touching latest
    pub fn verify_writes(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn latest_key(&self) -> String {
        format!("{}/{}", self.prefix, LATEST_PREDICTIONS_FILE)
    }

    /// `<prefix>/injury_predictions_<YYYYMMDD_HHMMSS>[_<n>].csv`, first one not yet taken
    pub fn timestamped_key(&self, at: DateTime<Utc>) -> PipelineResult<String> {
        let stem = format!(
            "{}/injury_predictions_{}",
            self.prefix,
            at.format("%Y%m%d_%H%M%S")
        );

        for n in 0..=MAX_KEY_SUFFIX {
            let key = if n == 0 {
                format!("{}.csv", stem)
            } else {
                format!("{}_{}.csv", stem, n)
            };
            let taken = with_retry(&self.retry, &format!("exists {}", key), || self.store.exists(&key))
                .map_err(|e| PipelineError::publish(&key, e))?;
            if !taken {
                return Ok(key);
            }
            log::warn!("Prediction key {} already exists", key);
        }

        Err(PipelineError::publish(
            &format!("{}.csv", stem),
            format!("no free key after {} suffixes", MAX_KEY_SUFFIX),
        ))
    }

    fn put(&self, key: &str, payload: &[u8]) -> PipelineResult<()> {
        with_retry(&self.retry, &format!("put {}", key), || {
            self.store.put(key, payload, CSV_CONTENT_TYPE)
        })
        .map_err(|e| PipelineError::publish(key, e))
    }

    fn check_written(&self, key: &str, digest: &str) -> PipelineResult<()> {
        let stored = with_retry(&self.retry, &format!("verify {}", key), || self.store.get(key))
            .map_err(|e| PipelineError::publish(key, e))?;
        let stored_digest = sha256_hex(&stored);
        if stored_digest != digest {
            return Err(PipelineError::publish(
                key,
                format!("read-back digest {} differs from payload {}", stored_digest, digest),
            ));
        }
        Ok(())
    }

    pub fn publish(
        &self,
        results: &[PredictionResult],
        at: DateTime<Utc>,
    ) -> PipelineResult<PublishReceipt> {
        let timestamped_key = self.timestamped_key(at)?;
        let latest_key = self.latest_key();

        let payload =
            to_csv_bytes(results).map_err(|e| PipelineError::publish(&timestamped_key, e))?;
        let digest = sha256_hex(&payload);

        self.put(&timestamped_key, &payload)?;
        if self.verify {
            self.check_written(&timestamped_key, &digest)?;
        }
        log::info!("Saved predictions to {}", timestamped_key);

        self.put(&latest_key, &payload)?;
        log::info!("Updated {}", latest_key);

        Ok(PublishReceipt {
            timestamped_key,
            latest_key,
            bytes: payload.len(),
            digest,
        })
    }
}
