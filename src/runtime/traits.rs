//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime with mock implementations.

use crate::llm::{LlmError, LlmRequest, LlmResponse, ModelRegistry, ModelTier};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for making generation requests
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a generation request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        (**self).complete(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Adapter to use `ModelRegistry` as `LlmClient`, routing by requested tier
pub struct RegistryLlmClient {
    registry: Arc<ModelRegistry>,
    model_id: String,
}

impl RegistryLlmClient {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        let model_id = registry
            .get(ModelTier::Standard)
            .map(|svc| svc.model_id().to_string())
            .unwrap_or_default();
        Self { registry, model_id }
    }
}

#[async_trait]
impl LlmClient for RegistryLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let llm = self
            .registry
            .get(request.tier)
            .ok_or_else(|| LlmError::network("No LLM available"))?;
        llm.complete(request).await
    }

    /// Model of the standard tier
    fn model_id(&self) -> &str {
        &self.model_id
    }
}
