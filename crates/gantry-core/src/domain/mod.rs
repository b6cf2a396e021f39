//! Domain types for the gantry gateway.
//!
//! Pure data types with no infrastructure dependencies.

pub mod chat;
pub mod completion;
pub mod orchestration;
pub mod service;

pub use chat::{ChatMessage, MessageRole, Transcript};
pub use completion::{Completion, ModelTier, Usage};
pub use orchestration::{
    Directive, DirectiveResolution, OrchestrationResponse, ProcessingMode, ResponseMetadata,
};
pub use service::{ServiceCallOutcome, ServiceCallResult, ServiceEndpoint, ServiceKind};
