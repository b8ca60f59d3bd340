//! Versioned event schemas shared by every Campus service.
//!
//! The routing-key set is closed: adding an event means adding a [`RoutingKey`]
//! variant, a payload struct, and an [`Event`] arm, and the compiler walks every
//! consumer through its match. Payload field names are camelCase on the wire.

pub mod envelope;
pub mod event;

pub use envelope::{EventEnvelope, SCHEMA_VERSION};
pub use event::{
    EmailVerification, Event, ParentCreated, PasswordReset, RoutingKey, StudentCreated,
    TeacherCreated,
};
