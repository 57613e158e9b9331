//! Registry mapping capability tiers to generation services

use super::{all_tiers, GeminiService, LlmError, LlmService, LoggingService, ModelTier};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration for the generation provider
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: String,
    /// Optional gateway URL; the gateway handles authentication
    pub gateway: Option<String>,
    /// Model override for the standard tier
    pub standard_model: Option<String>,
    /// Model override for the advanced tier
    pub advanced_model: Option<String>,
}

impl LlmConfig {
    fn model_for(&self, tier: ModelTier) -> Option<&str> {
        match tier {
            ModelTier::Standard => self.standard_model.as_deref(),
            ModelTier::Advanced => self.advanced_model.as_deref(),
        }
    }
}

/// One service per capability tier
pub struct ModelRegistry {
    services: HashMap<ModelTier, Arc<dyn LlmService>>,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        // In gateway mode the gateway authenticates, the key is a placeholder
        let api_key = if config.gateway.is_some() {
            "implicit".to_string()
        } else {
            config.api_key.clone()
        };

        let mut services: HashMap<ModelTier, Arc<dyn LlmService>> = HashMap::new();
        for def in all_tiers() {
            let model = config.model_for(def.tier).unwrap_or(def.default_model);
            let service = GeminiService::new(api_key.clone(), model, config.gateway.as_deref())?;
            tracing::debug!(tier = %def.tier, model, description = def.description, "Registered model");
            services.insert(def.tier, Arc::new(LoggingService::new(Arc::new(service))));
        }

        Ok(Self { services })
    }

    /// Registry backed by explicit services
    #[cfg(test)]
    pub fn from_services(services: impl IntoIterator<Item = (ModelTier, Arc<dyn LlmService>)>) -> Self {
        Self {
            services: services.into_iter().collect(),
        }
    }

    /// Service for a tier, falling back to the standard tier
    pub fn get(&self, tier: ModelTier) -> Option<Arc<dyn LlmService>> {
        self.services
            .get(&tier)
            .or_else(|| self.services.get(&ModelTier::Standard))
            .cloned()
    }

    /// Configured model per tier, for startup logging
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self
            .services
            .iter()
            .map(|(tier, svc)| format!("{tier}={}", svc.model_id()))
            .collect();
        models.sort();
        models
    }
}
