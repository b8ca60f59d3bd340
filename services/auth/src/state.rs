use sea_orm::DatabaseConnection;

use campus_bus::BusClient;

use crate::config::AuthConfig;
use crate::infra::db::{DbRefreshTokenRepository, DbUserRepository, DbVerificationTokenRepository};
use crate::outbox::DbOutboxStore;

/// Signing secrets for the three token families.
#[derive(Clone)]
pub struct TokenSecrets {
    pub access: String,
    pub refresh: String,
    pub verification: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub bus: BusClient,
    pub secrets: TokenSecrets,
    pub cookie_domain: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, bus: BusClient, config: &AuthConfig) -> Self {
        Self {
            db,
            bus,
            secrets: TokenSecrets {
                access: config.access_token_secret.clone(),
                refresh: config.refresh_token_secret.clone(),
                verification: config.verification_token_secret.clone(),
            },
            cookie_domain: config.cookie_domain.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn refresh_token_repo(&self) -> DbRefreshTokenRepository {
        DbRefreshTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_token_repo(&self) -> DbVerificationTokenRepository {
        DbVerificationTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_store(&self) -> DbOutboxStore {
        DbOutboxStore {
            db: self.db.clone(),
        }
    }
}
