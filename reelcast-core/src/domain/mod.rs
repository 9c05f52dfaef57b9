//! Core domain types
//!
//! These types describe a single pipeline run: the validated request that
//! starts it, the ordered step log it produces, and the result it returns.
//! They are shared between the server (which runs pipelines) and the CLI
//! (which renders them).

pub mod log;
pub mod request;
pub mod result;
