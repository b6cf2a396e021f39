//! Concurrent, bounded fan-out to backend analysis services.
//!
//! Every call in a batch is issued before any result is awaited, each with
//! its own timeout. A slow or failing service never blocks or fails the
//! batch; partial success is the normal case.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use crate::domain::service::{ServiceCallOutcome, ServiceCallResult, ServiceKind};
use crate::ports::analysis::AnalysisBackend;
use crate::registry::ServiceRegistry;

/// Dispatches queries to backend analysis services with full concurrency.
pub struct ServiceDispatcher {
    registry: Arc<ServiceRegistry>,
    backend: Arc<dyn AnalysisBackend>,
    call_timeout: Duration,
}

impl ServiceDispatcher {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        backend: Arc<dyn AnalysisBackend>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            backend,
            call_timeout,
        }
    }

    /// Query every requested service concurrently.
    ///
    /// Duplicates in `services` collapse to one call. Results come back in
    /// request order, independent of completion order, one per requested
    /// service.
    pub async fn dispatch(
        &self,
        services: &[ServiceKind],
        query: &str,
        request_id: &str,
    ) -> Vec<ServiceCallResult> {
        let mut requested: Vec<ServiceKind> = Vec::with_capacity(services.len());
        for &kind in services {
            if !requested.contains(&kind) {
                requested.push(kind);
            }
        }
        if requested.is_empty() {
            return Vec::new();
        }

        tracing::debug!(
            target: "gantry.dispatch",
            request_id,
            services = ?requested,
            "dispatching service batch"
        );

        let calls = requested
            .iter()
            .map(|&kind| self.call_one(kind, query, request_id));
        join_all(calls).await
    }

    /// One bounded call. All failure shapes materialize as an outcome.
    async fn call_one(
        &self,
        service: ServiceKind,
        query: &str,
        request_id: &str,
    ) -> ServiceCallResult {
        let Some(endpoint) = self.registry.endpoint(service) else {
            tracing::debug!(
                target: "gantry.dispatch",
                request_id,
                %service,
                "service not registered, skipping call"
            );
            return ServiceCallResult {
                service,
                outcome: ServiceCallOutcome::Unavailable,
            };
        };

        let call = self.backend.analyze(endpoint, query, request_id);
        let outcome = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(payload)) => ServiceCallOutcome::Success(payload),
            Ok(Err(err)) => {
                tracing::warn!(
                    target: "gantry.dispatch",
                    request_id,
                    %service,
                    error = %err,
                    "service call failed"
                );
                ServiceCallOutcome::Error(err.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    target: "gantry.dispatch",
                    request_id,
                    %service,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "service call timed out"
                );
                ServiceCallOutcome::Timeout
            }
        };

        ServiceCallResult { service, outcome }
    }
}
