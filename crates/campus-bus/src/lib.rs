//! Message bus plumbing over Redis Streams.
//!
//! One durable stream carries every event; consumer groups give each service
//! its own durable queue over it. Entries are acked only after the handler
//! succeeds (at-least-once). Failed deliveries are re-published with a bumped
//! attempt counter and end up on the `<stream>:dead` stream once the attempt
//! budget is spent.

#![allow(async_fn_in_trait)]

pub mod client;
pub mod consumer;
pub mod error;
pub mod outbox;
mod wire;

pub use client::BusClient;
pub use consumer::{BusConsumer, ConsumerConfig, Delivery};
pub use error::BusError;
pub use outbox::{OutboxEntry, OutboxRelay, OutboxStore, RelayConfig};
