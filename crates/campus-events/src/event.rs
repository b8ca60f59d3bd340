use serde::{Deserialize, Serialize};

use campus_domain::user::UserRole;

/// Closed set of routing keys carried on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingKey {
    StudentCreated,
    TeacherCreated,
    ParentCreated,
    PasswordReset,
    EmailVerification,
}

impl RoutingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StudentCreated => "student.created",
            Self::TeacherCreated => "teacher.created",
            Self::ParentCreated => "parent.created",
            Self::PasswordReset => "auth.user.password_reset",
            Self::EmailVerification => "auth.user.email_verification",
        }
    }

    /// Parse a wire routing key. Returns `None` for keys this platform
    /// version does not know — consumers ignore those deliveries.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student.created" => Some(Self::StudentCreated),
            "teacher.created" => Some(Self::TeacherCreated),
            "parent.created" => Some(Self::ParentCreated),
            "auth.user.password_reset" => Some(Self::PasswordReset),
            "auth.user.email_verification" => Some(Self::EmailVerification),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `student.created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreated {
    pub student_id: String,
    pub email: String,
    pub parent_id: Option<String>,
}

/// Payload of `teacher.created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCreated {
    pub teacher_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Payload of `parent.created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCreated {
    pub parent_id: String,
    pub email: String,
}

/// Payload of `auth.user.password_reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub reset_token: String,
}

/// Payload of `auth.user.email_verification`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerification {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub verification_token: String,
}

/// Union of every event the platform publishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StudentCreated(StudentCreated),
    TeacherCreated(TeacherCreated),
    ParentCreated(ParentCreated),
    PasswordReset(PasswordReset),
    EmailVerification(EmailVerification),
}

impl Event {
    pub fn routing_key(&self) -> RoutingKey {
        match self {
            Self::StudentCreated(_) => RoutingKey::StudentCreated,
            Self::TeacherCreated(_) => RoutingKey::TeacherCreated,
            Self::ParentCreated(_) => RoutingKey::ParentCreated,
            Self::PasswordReset(_) => RoutingKey::PasswordReset,
            Self::EmailVerification(_) => RoutingKey::EmailVerification,
        }
    }

    /// Serialize the payload for the wire (routing key + JSON body).
    pub fn encode(&self) -> Result<(RoutingKey, serde_json::Value), serde_json::Error> {
        let payload = match self {
            Self::StudentCreated(p) => serde_json::to_value(p)?,
            Self::TeacherCreated(p) => serde_json::to_value(p)?,
            Self::ParentCreated(p) => serde_json::to_value(p)?,
            Self::PasswordReset(p) => serde_json::to_value(p)?,
            Self::EmailVerification(p) => serde_json::to_value(p)?,
        };
        Ok((self.routing_key(), payload))
    }

    /// Decode a payload for a known routing key.
    pub fn decode(key: RoutingKey, payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let payload = payload.clone();
        Ok(match key {
            RoutingKey::StudentCreated => Self::StudentCreated(serde_json::from_value(payload)?),
            RoutingKey::TeacherCreated => Self::TeacherCreated(serde_json::from_value(payload)?),
            RoutingKey::ParentCreated => Self::ParentCreated(serde_json::from_value(payload)?),
            RoutingKey::PasswordReset => Self::PasswordReset(serde_json::from_value(payload)?),
            RoutingKey::EmailVerification => {
                Self::EmailVerification(serde_json::from_value(payload)?)
            }
        })
    }
}
