//! HTTP clients for gantry's outbound dependencies.
//!
//! Implements the `gantry-core` ports with reqwest: the completion
//! provider, the backend analysis services, and the delegated external
//! orchestrator. Errors are mapped to the core port error types at this
//! boundary; nothing reqwest-shaped leaks upward.

#![deny(unused_crate_dependencies)]

pub mod analysis;
pub mod completion;
pub mod delegate;

pub use analysis::HttpAnalysisClient;
pub use completion::HttpCompletionClient;
pub use delegate::HttpDelegateClient;
