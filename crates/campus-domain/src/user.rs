//! User domain types.

use serde::{Deserialize, Serialize};

/// Account role within the platform.
///
/// Wire format: `u8` (0 = Student, 1 = Teacher, 2 = Parent, 3 = Admin).
/// The string form (serde, snake_case) is what event payloads carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student = 0,
    Teacher = 1,
    Parent = 2,
    Admin = 3,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Student),
            1 => Some(Self::Teacher),
            2 => Some(Self::Parent),
            3 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the `i16` column value used by sea-orm entities.
    pub fn from_i16(v: i16) -> Option<Self> {
        u8::try_from(v).ok().and_then(Self::from_u8)
    }
}
