//! Model version tag
//!
//! The training job encodes the model version as a `YYYYMMDD_HHMMSS`
//! timestamp in the artifact key. The SHA-256 of the blob identifies the
//! exact bytes scored against.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

static VERSION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{8})_(\d{6})").expect("version tag pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub key: String,
    /// e.g. `20250820_161828`
    pub tag: Option<String>,
    pub trained_at: Option<NaiveDateTime>,
    /// Hex SHA-256 of the artifact bytes
    pub digest: String,
    pub size_bytes: usize,
}

impl ModelVersion {
    pub fn from_blob(key: &str, blob: &[u8]) -> Self {
        let (tag, trained_at) = parse_tag(key);
        Self {
            key: key.to_string(),
            tag,
            trained_at,
            digest: sha256_hex(blob),
            size_bytes: blob.len(),
        }
    }

    /// Short label for logs: tag if known, digest prefix otherwise
    pub fn label(&self) -> String {
        match &self.tag {
            Some(tag) => tag.clone(),
            None => self.digest.chars().take(12).collect(),
        }
    }
}

fn parse_tag(key: &str) -> (Option<String>, Option<NaiveDateTime>) {
    let Some(caps) = VERSION_TAG.captures(key) else {
        return (None, None);
    };
    let tag = format!("{}_{}", &caps[1], &caps[2]);
    let trained_at = NaiveDateTime::parse_from_str(&tag, "%Y%m%d_%H%M%S").ok();
    (Some(tag), trained_at)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
