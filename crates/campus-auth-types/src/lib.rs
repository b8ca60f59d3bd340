//! Auth types shared across Campus services.
//!
//! Provides JWT validation and the session cookie builders. Token issuing
//! lives in the auth service behind the `USE_ONLY_IN_AUTH_SERVICE` feature.

pub mod cookie;
pub mod token;
