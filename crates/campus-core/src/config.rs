/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (env var names map to lowercased
/// field names) and call `Config::from_env()` once at startup.
///
/// # Panics
///
/// Panics if a required env var is missing or cannot be deserialized —
/// a service with broken configuration should not come up.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }
}
