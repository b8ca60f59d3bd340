//! Cross-cutting service plumbing: health handlers, tracing setup, env
//! config loading, request-id middleware and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
