//! Test artifacts over the canonical 34-feature layout
//!
//! The model is a single tree on scaled `fatigue_score` and raw
//! `age_at_game`:
//! - fatigue < 0.65 -> leaf -1.0
//! - otherwise age < 30 -> leaf 0.4, else leaf 1.2

use serde_json::json;

use crate::logic::artifacts::ArtifactKeys;
use crate::logic::features::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
use crate::logic::store::MemoryStore;

pub const FATIGUE: usize = 28;
pub const AGE: usize = 30;

/// sigmoid of the three leaf values (base score 0.5 adds nothing)
pub const P_LOW_FATIGUE: f64 = 0.268_941_421_369_995_1;
pub const P_YOUNG: f64 = 0.598_687_660_112_452_3;
pub const P_OLD: f64 = 0.768_524_783_499_017_7;

pub fn schema_json() -> Vec<u8> {
    json!({ "version": FEATURE_VERSION, "features": FEATURE_LAYOUT })
        .to_string()
        .into_bytes()
}

pub fn scaler_json() -> Vec<u8> {
    let mut mean = vec![0.0; FEATURE_COUNT];
    let mut scale = vec![1.0; FEATURE_COUNT];
    mean[FATIGUE] = 0.5;
    scale[FATIGUE] = 0.1;
    json!({
        "kind": "standard",
        "mean": mean,
        "scale": scale,
        "feature_names": FEATURE_LAYOUT,
    })
    .to_string()
    .into_bytes()
}

pub fn model_json() -> Vec<u8> {
    json!({
        "kind": "tree_ensemble",
        "base_score": 0.5,
        "num_features": FEATURE_COUNT,
        "trees": [{
            "left_children": [1, -1, 3, -1, -1],
            "right_children": [2, -1, 4, -1, -1],
            "split_indices": [FATIGUE, 0, AGE, 0, 0],
            "split_conditions": [1.5, -1.0, 30.0, 0.4, 1.2],
            "default_left": [true, false, true, false, false],
        }],
    })
    .to_string()
    .into_bytes()
}

/// Store holding all three artifacts under the default keys
pub fn seeded_store() -> MemoryStore {
    let keys = ArtifactKeys::default();
    let store = MemoryStore::new();
    store.insert(&keys.schema, schema_json());
    store.insert(&keys.scaler, scaler_json());
    store.insert(&keys.model, model_json());
    store
}

#[test]
fn fixture_indices_match_layout() {
    assert_eq!(feature_index("fatigue_score"), Some(FATIGUE));
    assert_eq!(feature_index("age_at_game"), Some(AGE));
}
