//! Service Module
//!
//! Business logic layer for the server.
//! The pipeline runner drives the provider clients; run configuration and
//! job polling support it.

pub mod pipeline;
pub mod poll;
pub mod run_config;

#[cfg(test)]
pub(crate) mod testing;

// Re-export for convenience
pub use pipeline::{PipelineError, PipelineRunner};
pub use run_config::RunConfig;
