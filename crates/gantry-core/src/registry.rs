//! Service registry: identifier to endpoint mapping.
//!
//! Built once from [`GatewayConfig`] at startup and read-only afterwards,
//! so it is safe for unsynchronized concurrent reads across requests.

use std::collections::HashMap;

use crate::config::GatewayConfig;
use crate::domain::service::{ServiceEndpoint, ServiceKind};

/// Process-wide mapping from service identifier to network endpoint.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    endpoints: HashMap<ServiceKind, ServiceEndpoint>,
}

impl ServiceRegistry {
    /// Build the registry from startup configuration.
    ///
    /// A service configured twice keeps the last endpoint.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::from_endpoints(config.services.clone())
    }

    #[must_use]
    pub fn from_endpoints(endpoints: Vec<ServiceEndpoint>) -> Self {
        Self {
            endpoints: endpoints.into_iter().map(|e| (e.kind, e)).collect(),
        }
    }

    /// Look up the endpoint for a service, if registered.
    #[must_use]
    pub fn endpoint(&self, kind: ServiceKind) -> Option<&ServiceEndpoint> {
        self.endpoints.get(&kind)
    }

    #[must_use]
    pub fn contains(&self, kind: ServiceKind) -> bool {
        self.endpoints.contains_key(&kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
