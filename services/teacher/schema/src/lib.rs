//! sea-orm entities for the teacher database.

pub mod outbox_events;
pub mod teachers;
