//! Reelcast Core
//!
//! Core types shared by the Reelcast server, HTTP clients and CLI.
//!
//! This crate contains:
//! - Domain types: the parsed run request, step logs and pipeline results
//! - DTOs: the JSON shapes exchanged over `POST /api/run`

pub mod domain;
pub mod dto;
