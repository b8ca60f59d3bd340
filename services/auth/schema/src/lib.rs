//! sea-orm entities for the auth database.

pub mod outbox_events;
pub mod refresh_tokens;
pub mod users;
pub mod verification_tokens;
