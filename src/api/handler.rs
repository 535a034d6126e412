use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::response::{InvocationResponse, SuccessBody};
use crate::config::PipelineConfig;
use crate::logic::pipeline::Pipeline;
use crate::logic::store::ObjectStore;

/// Per-invocation metadata supplied by the trigger
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: String,
    pub function_name: String,
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            function_name: crate::constants::APP_NAME.to_string(),
        }
    }
}

/// Owns configuration and store for the lifetime of the process;
/// model artifacts are reloaded on every event
pub struct InvocationHandler {
    config: PipelineConfig,
    store: Box<dyn ObjectStore>,
}

impl InvocationHandler {
    pub fn new(config: PipelineConfig, store: Box<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    pub fn from_config(config: PipelineConfig) -> Self {
        let store = config.open_store();
        Self::new(config, store)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn handle(&self, event: &Value, context: &InvocationContext) -> InvocationResponse {
        self.handle_at(event, context, Utc::now())
    }

    pub fn handle_at(
        &self,
        event: &Value,
        context: &InvocationContext,
        now: DateTime<Utc>,
    ) -> InvocationResponse {
        log::info!(
            "Invocation {} ({}) event: {}",
            context.request_id,
            context.function_name,
            event
        );

        let pipeline = Pipeline::new(&self.config, self.store.as_ref());
        match pipeline.run_at(now) {
            Ok(summary) => {
                InvocationResponse::success(&SuccessBody::from_summary(&summary, self.config.sample_size))
            }
            Err(e) => {
                log::error!("Invocation {} failed [{}]: {}", context.request_id, e.kind(), e);
                InvocationResponse::failure(&e.to_string())
            }
        }
    }
}
