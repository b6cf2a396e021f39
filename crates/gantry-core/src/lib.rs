//! Core domain types, ports, and orchestration services for the gantry
//! AI gateway.
//!
//! The flow for one request: intent classification (or a completion-emitted
//! directive, depending on the configured dispatch mode) selects backend
//! analysis services, the dispatcher fans out to them concurrently with a
//! per-call bound, and the synthesizer merges their payloads with the
//! model-generated narrative. The pipeline wraps all of it in a fallback
//! ladder that always produces a well-formed response.
//!
//! Infrastructure (HTTP clients and the web adapter) lives in sibling
//! crates and reaches this one only through the traits in [`ports`].

#![deny(unused_crate_dependencies)]

pub mod classifier;
pub mod config;
pub mod directive;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{
    CompletionConfig, DEFAULT_DISPATCH_TIMEOUT, DelegateConfig, DispatchMode, GatewayConfig,
};
pub use domain::{
    ChatMessage, Completion, Directive, DirectiveResolution, MessageRole, ModelTier,
    OrchestrationResponse, ProcessingMode, ResponseMetadata, ServiceCallOutcome,
    ServiceCallResult, ServiceEndpoint, ServiceKind, Transcript, Usage,
};
pub use ports::{
    AnalysisBackend, AnalysisError, CompletionBackend, CompletionError, DelegateBackend,
    DelegateError, DelegateReply,
};
pub use registry::ServiceRegistry;
pub use services::{ClientError, OrchestrationPipeline, ServiceDispatcher};
