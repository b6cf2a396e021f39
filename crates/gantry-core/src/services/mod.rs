//! Orchestration services composing the gateway's request flow.

pub mod dispatch;
pub mod pipeline;
pub mod synthesize;

pub use dispatch::ServiceDispatcher;
pub use pipeline::{ClientError, OrchestrationPipeline};
pub use synthesize::{Synthesis, synthesize};
