//! End-to-end invocation tests
//!
//! Full handler runs against an in-memory store seeded with a one-tree
//! model over the 34-feature layout.

#[cfg(test)]
mod invocation_tests {
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::api::{InvocationContext, InvocationHandler, InvocationResponse};
    use crate::config::{FeatureSourceKind, PipelineConfig, ScorerKind};
    use crate::logic::artifacts::ArtifactKeys;
    use crate::logic::fixtures::{self, P_LOW_FATIGUE, P_OLD, P_YOUNG};
    use crate::logic::model::RiskLevel;
    use crate::logic::store::{MemoryStore, RetryPolicy};

    const LATEST: &str = "predictions/latest_predictions.csv";
    const STAMPED: &str = "predictions/injury_predictions_20250820_161828.csv";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, 16, 18, 28).unwrap()
    }

    fn config(source: FeatureSourceKind, scorer: ScorerKind) -> PipelineConfig {
        PipelineConfig {
            feature_source: source,
            scorer,
            retry: RetryPolicy::immediate(2),
            ..PipelineConfig::default()
        }
    }

    fn invoke(handler: &InvocationHandler) -> (InvocationResponse, Value) {
        let response = handler.handle_at(&json!({"source": "test"}), &InvocationContext::default(), now());
        let body = serde_json::from_str(&response.body).unwrap();
        (response, body)
    }

    fn probability(body: &Value, player: &str) -> f64 {
        body["sample_predictions"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["player_name"] == player)
            .and_then(|p| p["risk_probability"].as_f64())
            .unwrap()
    }

    #[test]
    fn test_static_model_invocation() {
        let handler = InvocationHandler::new(
            config(FeatureSourceKind::Static, ScorerKind::Model),
            Box::new(fixtures::seeded_store()),
        );
        let (response, body) = invoke(&handler);

        assert_eq!(response.status_code, 200);
        assert_eq!(body["message"], "Predictions completed successfully");
        assert_eq!(body["predictions_made"], 5);
        assert_eq!(body["high_risk_players"], 3);
        assert_eq!(body["flagged_players"], 3);
        assert_eq!(
            body["risk_levels"],
            json!({"Low": 0, "Medium": 2, "High": 0, "Critical": 3})
        );
        assert_eq!(body["scoring_method"], "model");
        assert_eq!(body["feature_source"], "static");
        assert_eq!(body["model_version"], "20250820_161828");
        assert_eq!(body["predictions_key"], STAMPED);
        assert!(DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());

        assert_abs_diff_eq!(probability(&body, "LeBron James"), P_OLD, epsilon = 1e-9);
        assert_abs_diff_eq!(probability(&body, "Stephen Curry"), P_LOW_FATIGUE, epsilon = 1e-9);
        assert_abs_diff_eq!(probability(&body, "Giannis Antetokounmpo"), P_YOUNG, epsilon = 1e-9);

        let first = &body["sample_predictions"][0];
        assert_eq!(first["risk_level"], "Critical");
        assert_eq!(first["risk_prediction"], 1);
        assert_eq!(first["prediction_date"], "2025-08-20");
        assert_eq!(body["sample_predictions"][1]["risk_level"], "Medium");
    }

    #[test]
    fn test_latest_equals_timestamped_payload() {
        let handler = InvocationHandler::new(
            config(FeatureSourceKind::Static, ScorerKind::Model),
            Box::new(fixtures::seeded_store()),
        );
        let (response, _) = invoke(&handler);
        assert!(response.is_success());

        let stamped = handler.store().get(STAMPED).unwrap();
        let latest = handler.store().get(LATEST).unwrap();
        assert_eq!(stamped, latest);

        let text = String::from_utf8(latest).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("player_name,position,risk_probability"));
    }

    #[test]
    fn test_synthetic_seed_42_end_to_end() {
        let run = || {
            let handler = InvocationHandler::new(
                config(FeatureSourceKind::Synthetic, ScorerKind::Model),
                Box::new(fixtures::seeded_store()),
            );
            let (response, body) = invoke(&handler);
            assert_eq!(response.status_code, 200);
            body
        };

        let first = run();
        let second = run();
        assert_eq!(first["sample_predictions"], second["sample_predictions"]);
        assert_eq!(first["predictions_made"], 5);

        for prediction in first["sample_predictions"].as_array().unwrap() {
            let p = prediction["risk_probability"].as_f64().unwrap();
            assert!((0.0..=1.0).contains(&p));
            assert!(
                [P_LOW_FATIGUE, P_YOUNG, P_OLD].iter().any(|leaf| (leaf - p).abs() < 1e-9),
                "unexpected probability {}",
                p
            );
        }
    }

    #[test]
    fn test_heuristic_scorer_is_labelled() {
        let store = MemoryStore::new();
        store.insert(&ArtifactKeys::default().schema, fixtures::schema_json());

        let handler = InvocationHandler::new(
            config(FeatureSourceKind::Static, ScorerKind::Heuristic),
            Box::new(store),
        );
        let (response, body) = invoke(&handler);

        assert_eq!(response.status_code, 200);
        assert_eq!(body["scoring_method"], "heuristic");
        assert!(body["model_version"].is_null());

        let policy = handler.config().policy().unwrap();
        let giannis = policy.level(probability(&body, "Giannis Antetokounmpo"));
        let curry = policy.level(probability(&body, "Stephen Curry"));
        assert!(giannis > curry);
        assert_eq!(giannis, RiskLevel::Critical);
    }

    #[test]
    fn test_malformed_artifact_yields_failure_response() {
        let keys = ArtifactKeys::default();
        for key in [keys.model.clone(), keys.scaler.clone(), keys.schema.clone()] {
            let store = fixtures::seeded_store();
            store.insert(&key, "not json at all {");

            let handler = InvocationHandler::new(
                config(FeatureSourceKind::Static, ScorerKind::Model),
                Box::new(store),
            );
            let (response, body) = invoke(&handler);

            assert_eq!(response.status_code, 500, "key {}", key);
            assert_eq!(body["message"], "Prediction failed");
            assert!(body["error"].as_str().unwrap().contains(&key));
            assert!(handler.store().get(LATEST).is_err());
        }
    }

    #[test]
    fn test_failed_timestamped_write_keeps_previous_latest() {
        let store = fixtures::seeded_store();
        store.insert(LATEST, "previous");
        store.fail_puts_with_prefix("predictions/injury_predictions_");

        let handler = InvocationHandler::new(
            config(FeatureSourceKind::Static, ScorerKind::Model),
            Box::new(store),
        );
        let (response, body) = invoke(&handler);

        assert_eq!(response.status_code, 500);
        assert!(body["error"].as_str().unwrap().starts_with("Publish failure"));
        assert_eq!(handler.store().get(LATEST).unwrap(), b"previous".to_vec());
    }

    #[test]
    fn test_sample_size_limits_body() {
        let mut cfg = config(FeatureSourceKind::Static, ScorerKind::Model);
        cfg.sample_size = 2;
        let handler = InvocationHandler::new(cfg, Box::new(fixtures::seeded_store()));
        let (_, body) = invoke(&handler);

        assert_eq!(body["predictions_made"], 5);
        assert_eq!(body["sample_predictions"].as_array().unwrap().len(), 2);
    }
}
