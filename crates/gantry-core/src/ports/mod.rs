//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the orchestration core expects from
//! infrastructure. They contain no implementation details and use only
//! domain types: no reqwest types in any signature, no URLs beyond the
//! registered endpoints.

pub mod analysis;
pub mod completion;
pub mod delegate;

pub use analysis::{AnalysisBackend, AnalysisError};
pub use completion::{CompletionBackend, CompletionError};
pub use delegate::{DelegateBackend, DelegateError, DelegateReply};
