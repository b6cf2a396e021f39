//! Gateway configuration.
//!
//! The configuration is read once at startup, wrapped in an `Arc`, and
//! injected into every component. Nothing mutates it at runtime.

use std::time::Duration;

use crate::domain::completion::ModelTier;
use crate::domain::service::{ServiceEndpoint, ServiceKind};

/// Default per-call bound for backend service dispatch.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default base URL for the OpenAI-compatible completion provider.
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_FAST_MODEL: &str = "gpt-4o-mini";
const DEFAULT_REASONING_MODEL: &str = "gpt-4o";

/// Whether services are consulted before or after the completion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Classify the query, fetch service data, then have the model narrate it.
    #[default]
    PreDispatch,
    /// Call the model first; dispatch only if it emits a service directive.
    PostDispatch,
}

impl DispatchMode {
    /// Parse a mode name from configuration.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre" | "pre-dispatch" | "predispatch" => Some(Self::PreDispatch),
            "post" | "post-dispatch" | "postdispatch" => Some(Self::PostDispatch),
            _ => None,
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// API credential. `None` means the provider is unconfigured and the
    /// pipeline falls through to the degraded tiers.
    pub api_key: Option<String>,
    pub base_url: String,
    pub fast_model: String,
    pub reasoning_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionConfig {
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    /// The configured model name for a tier.
    #[must_use]
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Reasoning => &self.reasoning_model,
        }
    }
}

/// External orchestrator used as the delegated fallback tier.
#[derive(Debug, Clone)]
pub struct DelegateConfig {
    pub base_url: String,
}

/// Process-wide gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub dispatch_mode: DispatchMode,
    /// Per-call bound for backend dispatch.
    pub dispatch_timeout: Duration,
    pub completion: CompletionConfig,
    /// Delegated-tier orchestrator; `None` skips that tier entirely.
    pub delegate: Option<DelegateConfig>,
    /// Registered backend service endpoints.
    pub services: Vec<ServiceEndpoint>,
}

impl GatewayConfig {
    /// Configuration with no credentials and no registered services.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            dispatch_mode: DispatchMode::default(),
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            completion: CompletionConfig::with_defaults(),
            delegate: None,
            services: Vec::new(),
        }
    }

    /// Read configuration from `GANTRY_*` environment variables.
    ///
    /// Unset variables fall back to defaults; a service with no
    /// `GANTRY_SERVICE_<NAME>_URL` is simply not registered.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::with_defaults();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(mode) = get("GANTRY_DISPATCH_MODE") {
            match DispatchMode::parse(&mode) {
                Some(parsed) => config.dispatch_mode = parsed,
                None => tracing::warn!(
                    target: "gantry.config",
                    value = %mode,
                    "unrecognized dispatch mode, keeping default"
                ),
            }
        }
        if let Some(secs) = get("GANTRY_DISPATCH_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) if parsed > 0 => {
                    config.dispatch_timeout = Duration::from_secs(parsed);
                }
                _ => tracing::warn!(
                    target: "gantry.config",
                    value = %secs,
                    "invalid dispatch timeout, keeping default"
                ),
            }
        }

        config.completion.api_key = get("GANTRY_COMPLETION_API_KEY");
        if let Some(url) = get("GANTRY_COMPLETION_BASE_URL") {
            config.completion.base_url = url;
        }
        if let Some(model) = get("GANTRY_MODEL_FAST") {
            config.completion.fast_model = model;
        }
        if let Some(model) = get("GANTRY_MODEL_REASONING") {
            config.completion.reasoning_model = model;
        }
        if let Some(max_tokens) = get("GANTRY_MAX_TOKENS") {
            match max_tokens.parse::<u32>() {
                Ok(parsed) if parsed > 0 => config.completion.max_tokens = parsed,
                _ => tracing::warn!(
                    target: "gantry.config",
                    value = %max_tokens,
                    "invalid max tokens, keeping default"
                ),
            }
        }

        config.delegate = get("GANTRY_DELEGATE_URL").map(|base_url| DelegateConfig { base_url });

        for kind in ServiceKind::ALL {
            let key = format!("GANTRY_SERVICE_{}_URL", kind.as_str().to_ascii_uppercase());
            if let Some(url) = get(&key) {
                config.services.push(ServiceEndpoint::new(kind, url));
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_have_no_credential_and_no_services() {
        let config = GatewayConfig::with_defaults();
        assert!(config.completion.api_key.is_none());
        assert!(config.services.is_empty());
        assert!(config.delegate.is_none());
        assert_eq!(config.dispatch_timeout, DEFAULT_DISPATCH_TIMEOUT);
        assert_eq!(config.dispatch_mode, DispatchMode::PreDispatch);
    }

    #[test]
    fn dispatch_mode_parsing() {
        assert_eq!(DispatchMode::parse("pre-dispatch"), Some(DispatchMode::PreDispatch));
        assert_eq!(DispatchMode::parse("POST"), Some(DispatchMode::PostDispatch));
        assert_eq!(DispatchMode::parse("sideways"), None);
    }

    #[test]
    fn from_lookup_reads_services_and_credential() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("GANTRY_COMPLETION_API_KEY", "sk-test"),
            ("GANTRY_DISPATCH_MODE", "post"),
            ("GANTRY_DISPATCH_TIMEOUT_SECS", "9"),
            ("GANTRY_SERVICE_COMPLIANCE_URL", "http://compliance.internal/"),
            ("GANTRY_SERVICE_BUDGET_URL", "http://budget.internal"),
            ("GANTRY_DELEGATE_URL", "http://conductor.internal"),
        ]));

        assert_eq!(config.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.dispatch_mode, DispatchMode::PostDispatch);
        assert_eq!(config.dispatch_timeout, Duration::from_secs(9));
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].kind, ServiceKind::Compliance);
        assert_eq!(config.services[0].base_url, "http://compliance.internal");
        assert!(config.delegate.is_some());
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("GANTRY_DISPATCH_MODE", "sideways"),
            ("GANTRY_DISPATCH_TIMEOUT_SECS", "zero"),
            ("GANTRY_MAX_TOKENS", "-4"),
            ("GANTRY_COMPLETION_API_KEY", "   "),
        ]));

        assert_eq!(config.dispatch_mode, DispatchMode::PreDispatch);
        assert_eq!(config.dispatch_timeout, DEFAULT_DISPATCH_TIMEOUT);
        assert_eq!(config.completion.max_tokens, 1024);
        assert!(config.completion.api_key.is_none());
    }

    #[test]
    fn model_for_tier() {
        let completion = CompletionConfig::with_defaults();
        assert_eq!(completion.model_for(ModelTier::Fast), DEFAULT_FAST_MODEL);
        assert_eq!(
            completion.model_for(ModelTier::Reasoning),
            DEFAULT_REASONING_MODEL
        );
    }
}
