//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variable names live here too so the CLI help and the
//! config loader never drift apart.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "injury-risk";

// ============================================
// Store layout
// ============================================

/// Default store namespace (bucket)
pub const DEFAULT_NAMESPACE: &str = "ryan-ml-sports-injury-prediction";

/// Default model artifact key. The timestamp in the key is the model version.
pub const DEFAULT_MODEL_KEY: &str = "models/xgboost_20250820_161828.json";

/// Default scaler artifact key
pub const DEFAULT_SCALER_KEY: &str = "models/nba_injury_predictor_v1_scaler.json";

/// Default feature schema key
pub const DEFAULT_SCHEMA_KEY: &str = "models/selected_features.json";

/// Prefix for published prediction files
pub const DEFAULT_PREDICTIONS_PREFIX: &str = "predictions";

/// Fixed name of the "latest" pointer under the predictions prefix
pub const LATEST_PREDICTIONS_FILE: &str = "latest_predictions.csv";

/// Content type used for published predictions
pub const CSV_CONTENT_TYPE: &str = "text/csv";

// ============================================
// Scoring defaults
// ============================================

/// Default binary decision threshold
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Default lower edges of Medium, High and Critical
pub const DEFAULT_BUCKET_EDGES: [f64; 3] = [0.1, 0.3, 0.5];

/// Default seed for synthetic feature generation
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Number of records echoed back in the response body
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

// ============================================
// Retry defaults
// ============================================

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;
pub const DEFAULT_RETRY_FACTOR: f64 = 2.0;

/// HTTP store request timeout (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ============================================
// Environment variables
// ============================================

pub const ENV_NAMESPACE: &str = "INJURY_RISK_NAMESPACE";
pub const ENV_MODEL_KEY: &str = "INJURY_RISK_MODEL_KEY";
pub const ENV_SCALER_KEY: &str = "INJURY_RISK_SCALER_KEY";
pub const ENV_SCHEMA_KEY: &str = "INJURY_RISK_SCHEMA_KEY";
pub const ENV_DECISION_THRESHOLD: &str = "INJURY_RISK_DECISION_THRESHOLD";
pub const ENV_BUCKET_EDGES: &str = "INJURY_RISK_BUCKET_EDGES";
pub const ENV_RANDOM_SEED: &str = "INJURY_RISK_RANDOM_SEED";
pub const ENV_FEATURE_SOURCE: &str = "INJURY_RISK_FEATURE_SOURCE";
pub const ENV_SCORER: &str = "INJURY_RISK_SCORER";
pub const ENV_STORE_ROOT: &str = "INJURY_RISK_STORE_ROOT";
pub const ENV_STORE_URL: &str = "INJURY_RISK_STORE_URL";
pub const ENV_STORE_TOKEN: &str = "INJURY_RISK_STORE_TOKEN";
