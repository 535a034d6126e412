//! Feature Schema - ordered feature names a model version expects
//!
//! **Order is part of the contract.** Reordering names silently corrupts
//! predictions, so every schema carries a CRC32 layout hash over its version
//! and names, and feature batches are stamped with the hash they were built
//! against.

use std::collections::HashSet;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::ArtifactError;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + names (0-separated)
pub fn layout_hash<S: AsRef<str>>(version: u32, names: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&version.to_le_bytes());

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    version: u32,
    names: Vec<String>,
    hash: u32,
}

/// Accepted wire shapes: a bare list, or a versioned document
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum SchemaDocument {
    Bare(Vec<String>),
    Versioned { version: u32, features: Vec<String> },
}

impl FeatureSchema {
    pub fn new(version: u32, names: Vec<String>) -> Result<Self, ArtifactError> {
        if names.is_empty() {
            return Err(ArtifactError::Invalid("feature schema is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.trim().is_empty() {
                return Err(ArtifactError::Invalid("feature schema contains a blank name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::Invalid(format!("duplicate feature '{}'", name)));
            }
        }

        let hash = layout_hash(version, &names);
        Ok(Self { version, names, hash })
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ArtifactError> {
        Self::new(1, names.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ArtifactError> {
        match serde_json::from_slice::<SchemaDocument>(bytes)? {
            SchemaDocument::Bare(names) => Self::new(1, names),
            SchemaDocument::Versioned { version, features } => Self::new(version, features),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ArtifactError> {
        let doc = SchemaDocument::Versioned {
            version: self.version,
            features: self.names.clone(),
        };
        Ok(serde_json::to_vec_pretty(&doc)?)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn layout_hash(&self) -> u32 {
        self.hash
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_versioned_documents() {
        let bare = FeatureSchema::from_json(br#"["age_at_game", "fatigue_score"]"#).unwrap();
        assert_eq!(bare.version(), 1);
        assert_eq!(bare.len(), 2);

        let versioned =
            FeatureSchema::from_json(br#"{"version": 3, "features": ["age_at_game"]}"#).unwrap();
        assert_eq!(versioned.version(), 3);
        assert_eq!(versioned.index_of("age_at_game"), Some(0));
    }

    #[test]
    fn test_order_changes_hash() {
        let a = FeatureSchema::from_names(&["a", "b"]).unwrap();
        let b = FeatureSchema::from_names(&["b", "a"]).unwrap();
        assert_ne!(a.layout_hash(), b.layout_hash());
    }

    #[test]
    fn test_version_changes_hash() {
        let names = vec!["a".to_string(), "b".to_string()];
        let v1 = FeatureSchema::new(1, names.clone()).unwrap();
        let v2 = FeatureSchema::new(2, names).unwrap();
        assert_ne!(v1.layout_hash(), v2.layout_hash());
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert!(FeatureSchema::from_names(&["a", "a"]).is_err());
        assert!(FeatureSchema::from_names::<&str>(&[]).is_err());
        assert!(FeatureSchema::from_names(&["a", " "]).is_err());
    }

    #[test]
    fn test_truncated_payload_is_malformed() {
        let err = FeatureSchema::from_json(br#"["age_at_game", "fat"#).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_hash() {
        let schema = FeatureSchema::new(2, vec!["x".into(), "y".into()]).unwrap();
        let back = FeatureSchema::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(schema, back);
    }
}
