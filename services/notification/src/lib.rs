#![allow(async_fn_in_trait)]

pub mod config;
pub mod consumer;
pub mod dedupe;
pub mod mailer;
pub mod router;
pub mod template;
