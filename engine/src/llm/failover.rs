//! Model Failover Router
//!
//! Atelier routes every model call the same way: the configured default
//! provider first, then the remaining providers in registration order, each
//! attempt bounded by a per-call timeout. The first completion wins; a
//! provider failure is logged and the next one is tried.

use super::{LLMError, LLMProvider, Message};
use std::time::Duration;

/// Ordered-failover router over the configured model providers
pub struct ModelRouter {
    /// Available model providers
    providers: Vec<Box<dyn LLMProvider>>,

    /// Name of the provider to try first
    default_provider: String,

    /// Per-attempt timeout
    request_timeout: Duration,
}

impl ModelRouter {
    /// Create a new model router
    ///
    /// # Arguments
    /// * `providers` - Available providers, in fallback order
    /// * `default_provider` - Name of the provider to try first
    /// * `request_timeout` - Timeout applied to each provider attempt
    pub fn new(
        providers: Vec<Box<dyn LLMProvider>>,
        default_provider: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            default_provider: default_provider.into(),
            request_timeout,
        }
    }

    /// Providers in attempt order: the configured default first, then the
    /// rest in registration order.
    fn attempt_order(&self) -> Vec<&dyn LLMProvider> {
        let mut ordered: Vec<&dyn LLMProvider> = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            if provider.name() == self.default_provider {
                ordered.insert(0, provider.as_ref());
            } else {
                ordered.push(provider.as_ref());
            }
        }
        ordered
    }

    /// Generate a completion, failing over across providers
    ///
    /// Attempts each provider in order with the configured timeout and
    /// returns the first successful completion. Returns
    /// `ProviderUnavailable` when every provider has been exhausted.
    pub async fn complete(&self, messages: &[Message]) -> super::Result<String> {
        if self.providers.is_empty() {
            return Err(LLMError::ProviderUnavailable(
                "No model providers configured".to_string(),
            ));
        }

        for provider in self.attempt_order() {
            tracing::debug!(
                "Attempting provider: {} (timeout: {}s)",
                provider.name(),
                self.request_timeout.as_secs()
            );

            let result =
                tokio::time::timeout(self.request_timeout, provider.generate(messages)).await;

            match result {
                Ok(Ok(completion)) => {
                    tracing::debug!("Provider {} succeeded", provider.name());
                    return Ok(completion);
                }
                Ok(Err(e)) => {
                    tracing::warn!("Provider {} failed: {}", provider.name(), e);
                }
                Err(_) => {
                    tracing::warn!(
                        "Provider {} timed out after {}s",
                        provider.name(),
                        self.request_timeout.as_secs()
                    );
                }
            }
        }

        tracing::error!("All model providers exhausted");
        Err(LLMError::ProviderUnavailable(
            "All model providers failed".to_string(),
        ))
    }

    /// Check the health of all registered providers.
    /// Returns a list of (provider_name, is_healthy).
    pub async fn check_health(&self) -> Vec<(&str, bool)> {
        let mut results = Vec::new();
        for provider in &self.providers {
            let is_healthy = provider.check_health().await;
            results.push((provider.name(), is_healthy));
        }
        results
    }
}
