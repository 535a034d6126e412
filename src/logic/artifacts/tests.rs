//! Loader tests against an in-memory store

#[cfg(test)]
mod loader_tests {
    use crate::error::PipelineError;
    use crate::logic::artifacts::{ArtifactKeys, ArtifactLoader};
    use crate::logic::features::FEATURE_COUNT;
    use crate::logic::fixtures;
    use crate::logic::store::{MemoryStore, RetryPolicy};

    fn loader(store: &MemoryStore) -> ArtifactLoader<'_> {
        ArtifactLoader::new(store, ArtifactKeys::default()).with_retry(RetryPolicy::immediate(3))
    }

    #[test]
    fn test_load_bundle() {
        let store = fixtures::seeded_store();
        let bundle = loader(&store).load_bundle().unwrap();

        assert_eq!(bundle.schema.len(), FEATURE_COUNT);
        assert_eq!(bundle.scaler.len(), FEATURE_COUNT);
        assert_eq!(bundle.model.kind(), "tree_ensemble");
        assert_eq!(bundle.version.tag.as_deref(), Some("20250820_161828"));
    }

    #[test]
    fn test_malformed_payload_fails_for_each_key() {
        let keys = ArtifactKeys::default();
        for key in [&keys.model, &keys.scaler, &keys.schema] {
            let store = fixtures::seeded_store();
            store.insert(key, "{\"kind\": ");

            match loader(&store).load_bundle() {
                Err(PipelineError::Load { key: failed, .. }) => assert_eq!(&failed, key),
                Err(other) => panic!("expected load failure for {}, got {}", key, other),
                Ok(_) => panic!("expected load failure for {}", key),
            }
        }
    }

    #[test]
    fn test_missing_key_is_load_failure() {
        let store = MemoryStore::new();
        store.insert(&ArtifactKeys::default().schema, fixtures::schema_json());

        let err = loader(&store).load_bundle().err().unwrap();
        assert!(matches!(err, PipelineError::Load { ref key, .. } if key == &ArtifactKeys::default().scaler));
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let store = fixtures::seeded_store();
        store.fail_gets_transiently(&ArtifactKeys::default().model, 2);
        assert!(loader(&store).load_bundle().is_ok());

        let store = fixtures::seeded_store();
        store.fail_gets_transiently(&ArtifactKeys::default().model, 3);
        assert!(matches!(
            loader(&store).load_bundle(),
            Err(PipelineError::Load { .. })
        ));
    }

    #[test]
    fn test_scaler_length_mismatch() {
        let store = fixtures::seeded_store();
        store.insert(
            &ArtifactKeys::default().scaler,
            r#"{"kind": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]}"#,
        );
        assert!(matches!(
            loader(&store).load_bundle(),
            Err(PipelineError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_model_feature_count_mismatch() {
        let store = fixtures::seeded_store();
        store.insert(
            &ArtifactKeys::default().model,
            r#"{"kind": "logistic", "coefficients": [0.1, 0.2, 0.3], "intercept": 0.0}"#,
        );
        assert!(matches!(
            loader(&store).load_bundle(),
            Err(PipelineError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_binary_model_without_onnx() {
        let store = fixtures::seeded_store();
        store.insert(&ArtifactKeys::default().model, vec![0x08u8, 0x07, 0x12, 0x04]);

        let result = loader(&store).load_bundle();
        if cfg!(feature = "onnx") {
            assert!(result.is_err());
        } else {
            assert!(matches!(result, Err(PipelineError::Load { ref reason, .. }) if reason.contains("onnx")));
        }
    }

    #[test]
    fn test_load_schema_alone() {
        let store = MemoryStore::new();
        store.insert(&ArtifactKeys::default().schema, r#"["total_actions", "fatigue_score"]"#);
        let schema = loader(&store).load_schema().unwrap();
        assert_eq!(schema.names(), ["total_actions".to_string(), "fatigue_score".to_string()]);
    }
}
