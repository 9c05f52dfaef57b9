//! Data Transfer Objects for the HTTP surface
//!
//! DTOs mirror the JSON bodies of the `/api/run` endpoint. They are kept
//! separate from the domain types so the wire shape can stay camelCase and
//! flat while the domain types stay strongly typed.

pub mod run;
