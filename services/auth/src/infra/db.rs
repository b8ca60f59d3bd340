use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use campus_auth_schema::{outbox_events, refresh_tokens, users, verification_tokens};
use campus_domain::user::UserRole;

use crate::domain::repository::{
    RefreshTokenRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::types::{OutboxEvent, RefreshTokenRecord, User, VerificationTokenRecord};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_external_id(
        &self,
        role: UserRole,
        external_id: &str,
    ) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Role.eq(role.as_u8() as i16))
            .filter(users::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .context("find user by external id")?;
        model.map(user_from_model).transpose()
    }

    async fn create_with_verification_and_outbox(
        &self,
        user: &User,
        token: &VerificationTokenRecord,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let user = user.clone();
                let token = token.clone();
                let event = event.clone();
                Box::pin(async move {
                    insert_user(txn, &user).await?;
                    insert_verification_token(txn, &token).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create user with verification and outbox")?;
        Ok(())
    }

    async fn activate_and_consume_token(
        &self,
        user_id: Uuid,
        token_id: Uuid,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        is_activated: Set(true),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    verification_tokens::ActiveModel {
                        id: Set(token_id),
                        used: Set(true),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("activate user and consume verification token")?;
        Ok(())
    }
}

async fn insert_user(txn: &DatabaseTransaction, user: &User) -> Result<(), sea_orm::DbErr> {
    users::ActiveModel {
        id: Set(user.id),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        role: Set(user.role.as_u8() as i16),
        is_activated: Set(user.is_activated),
        external_id: Set(user.external_id.clone()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_verification_token(
    txn: &DatabaseTransaction,
    token: &VerificationTokenRecord,
) -> Result<(), sea_orm::DbErr> {
    verification_tokens::ActiveModel {
        id: Set(token.id),
        user_id: Set(token.user_id),
        token: Set(token.token.clone()),
        expires_at: Set(token.expires_at),
        used: Set(token.used),
        created_at: Set(token.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> Result<User, AuthServiceError> {
    let role = UserRole::from_i16(model.role)
        .ok_or_else(|| anyhow::anyhow!("unknown role value in users row: {}", model.role))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        is_activated: model.is_activated,
        external_id: model.external_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Refresh-token repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRefreshTokenRepository {
    pub db: DatabaseConnection,
}

impl RefreshTokenRepository for DbRefreshTokenRepository {
    async fn replace_for_user(&self, record: &RefreshTokenRecord) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    refresh_tokens::Entity::delete_many()
                        .filter(refresh_tokens::Column::UserId.eq(record.user_id))
                        .exec(txn)
                        .await?;
                    refresh_tokens::ActiveModel {
                        id: Set(record.id),
                        user_id: Set(record.user_id),
                        expires_at: Set(record.expires_at),
                        revoked: Set(record.revoked),
                        created_at: Set(record.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace refresh token for user")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, AuthServiceError> {
        let model = refresh_tokens::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find refresh token by id")?;
        Ok(model.map(|m| RefreshTokenRecord {
            id: m.id,
            user_id: m.user_id,
            expires_at: m.expires_at,
            revoked: m.revoked,
            created_at: m.created_at,
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = refresh_tokens::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete refresh token")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Verification-token repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationTokenRepository {
    pub db: DatabaseConnection,
}

impl VerificationTokenRepository for DbVerificationTokenRepository {
    async fn create_with_outbox(
        &self,
        token: &VerificationTokenRecord,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let token = token.clone();
                let event = event.clone();
                Box::pin(async move {
                    insert_verification_token(txn, &token).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create verification token with outbox")?;
        Ok(())
    }

    async fn find_unused_by_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationTokenRecord>, AuthServiceError> {
        let model = verification_tokens::Entity::find()
            .filter(verification_tokens::Column::Token.eq(token))
            .filter(verification_tokens::Column::Used.eq(false))
            .one(&self.db)
            .await
            .context("find unused verification token")?;
        Ok(model.map(|m| VerificationTokenRecord {
            id: m.id,
            user_id: m.user_id,
            token: m.token,
            expires_at: m.expires_at,
            used: m.used,
            created_at: m.created_at,
        }))
    }
}
