//! Environment-supplied AI provider configuration.
//!
//! A backend joins the failover rotation only when it is enabled AND holds
//! a non-empty credential. The preference order is the fixed declaration
//! order below, not anything dynamic.

use std::sync::Arc;

use super::gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL};
use super::openai::OpenAiCompatClient;
use crate::infrastructure::ports::AiProviderPort;

#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub enabled: bool,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ProviderSettings {
    fn from_env(prefix: &str, default_model: &str, default_base_url: &str) -> Self {
        let var = |suffix: &str| std::env::var(format!("{prefix}_{suffix}")).unwrap_or_default();
        let enabled = var("ENABLED")
            .parse::<bool>()
            .unwrap_or(false);
        let model = {
            let m = var("MODEL");
            if m.is_empty() { default_model.to_string() } else { m }
        };
        let base_url = {
            let u = var("BASE_URL");
            if u.is_empty() { default_base_url.to_string() } else { u }
        };
        Self {
            enabled,
            api_key: var("API_KEY"),
            model,
            base_url,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

/// Configuration for all supported backends, in preference order.
#[derive(Debug, Clone, Default)]
pub struct ProvidersConfig {
    pub gemini: ProviderSettings,
    pub groq: ProviderSettings,
    pub openai: ProviderSettings,
}

impl ProvidersConfig {
    /// Read `GEMINI_*`, `GROQ_*`, and `OPENAI_*` variables
    /// (`_ENABLED`, `_API_KEY`, `_MODEL`, `_BASE_URL`).
    pub fn from_env() -> Self {
        Self {
            gemini: ProviderSettings::from_env(
                "GEMINI",
                "gemini-2.0-flash",
                DEFAULT_GEMINI_BASE_URL,
            ),
            groq: ProviderSettings::from_env(
                "GROQ",
                "llama-3.3-70b-versatile",
                "https://api.groq.com/openai",
            ),
            openai: ProviderSettings::from_env("OPENAI", "gpt-4o-mini", "https://api.openai.com"),
        }
    }

    /// Build the adapters for every usable backend, in preference order.
    pub fn build_providers(&self) -> Vec<Arc<dyn AiProviderPort>> {
        let mut providers: Vec<Arc<dyn AiProviderPort>> = Vec::new();

        if self.gemini.is_usable() {
            providers.push(Arc::new(GeminiClient::new(
                &self.gemini.base_url,
                &self.gemini.model,
                &self.gemini.api_key,
            )));
        }
        if self.groq.is_usable() {
            providers.push(Arc::new(OpenAiCompatClient::new(
                "groq",
                &self.groq.base_url,
                &self.groq.model,
                &self.groq.api_key,
            )));
        }
        if self.openai.is_usable() {
            providers.push(Arc::new(OpenAiCompatClient::new(
                "openai",
                &self.openai.base_url,
                &self.openai.model,
                &self.openai.api_key,
            )));
        }

        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_or_credential_less_backends_are_unusable() {
        let mut settings = ProviderSettings {
            enabled: true,
            api_key: "k".into(),
            model: "m".into(),
            base_url: "http://localhost".into(),
        };
        assert!(settings.is_usable());

        settings.api_key = "   ".into();
        assert!(!settings.is_usable());

        settings.api_key = "k".into();
        settings.enabled = false;
        assert!(!settings.is_usable());
    }

    #[test]
    fn build_skips_unusable_backends() {
        let config = ProvidersConfig {
            gemini: ProviderSettings {
                enabled: true,
                api_key: "g".into(),
                model: "gemini-2.0-flash".into(),
                base_url: DEFAULT_GEMINI_BASE_URL.into(),
            },
            groq: ProviderSettings::default(),
            openai: ProviderSettings {
                enabled: true,
                api_key: "o".into(),
                model: "gpt-4o-mini".into(),
                base_url: "https://api.openai.com".into(),
            },
        };

        let providers = config.build_providers();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].name(), "gemini");
        assert_eq!(providers[1].name(), "openai");
    }
}
