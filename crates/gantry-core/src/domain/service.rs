//! Backend analysis service identifiers and call results.

use serde::{Deserialize, Serialize};

/// The closed set of backend analysis services the gateway can consult.
///
/// Variant order is the fixed priority order used by intent classification
/// and anywhere else services are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Compliance,
    Risk,
    Hse,
    Qaqc,
    Schedule,
    Budget,
}

impl ServiceKind {
    /// All services in priority order.
    pub const ALL: [Self; 6] = [
        Self::Compliance,
        Self::Risk,
        Self::Hse,
        Self::Qaqc,
        Self::Schedule,
        Self::Budget,
    ];

    /// Parse a service identifier from its wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compliance" => Some(Self::Compliance),
            "risk" => Some(Self::Risk),
            "hse" => Some(Self::Hse),
            "qaqc" => Some(Self::Qaqc),
            "schedule" => Some(Self::Schedule),
            "budget" => Some(Self::Budget),
            _ => None,
        }
    }

    /// Wire name of the service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compliance => "compliance",
            Self::Risk => "risk",
            Self::Hse => "hse",
            Self::Qaqc => "qaqc",
            Self::Schedule => "schedule",
            Self::Budget => "budget",
        }
    }

    /// Human-readable label used when rendering payloads into a reply.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Compliance => "Compliance Analysis",
            Self::Risk => "Risk Analysis",
            Self::Hse => "HSE Analysis",
            Self::Qaqc => "QA/QC Analysis",
            Self::Schedule => "Schedule Analysis",
            Self::Budget => "Budget Analysis",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered network endpoint for one backend service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub kind: ServiceKind,
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
}

impl ServiceEndpoint {
    #[must_use]
    pub fn new(kind: ServiceKind, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { kind, base_url }
    }
}

/// Outcome of one bounded backend call.
///
/// Dispatch never propagates failures; every call materializes as one of
/// these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCallOutcome {
    /// The service replied with a structured payload.
    Success(serde_json::Value),
    /// The service is not registered with the gateway.
    Unavailable,
    /// The call exceeded the per-call time bound.
    Timeout,
    /// The service was reachable but the call failed.
    Error(String),
}

/// Result of one backend call within a dispatch batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCallResult {
    pub service: ServiceKind,
    pub outcome: ServiceCallOutcome,
}

impl ServiceCallResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, ServiceCallOutcome::Success(_))
    }

    /// The payload, when the call succeeded.
    #[must_use]
    pub const fn payload(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            ServiceCallOutcome::Success(value) => Some(value),
            _ => None,
        }
    }
}
