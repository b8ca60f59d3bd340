use chrono::Utc;
use uuid::Uuid;

use campus_domain::user::UserRole;
use campus_events::Event;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::usecase::register::mint_verification;

#[derive(Debug, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Shadow user created; a verification mail is on its way out.
    Created(Uuid),
    /// Redelivery — the (role, external id) pair already has an account.
    AlreadyProvisioned(Uuid),
    /// The event carries nothing to provision (e.g. our own auth events).
    Ignored,
}

/// Create a shadow account for a `{role}.created` event: no password, not
/// activated, keyed by `(role, external_id)` so redeliveries are no-ops.
/// The account, its verification token and the email-verification outbox
/// event are written in one transaction.
pub struct ProvisionUserUseCase<U: UserRepository> {
    pub users: U,
    pub verification_secret: String,
}

impl<U: UserRepository> ProvisionUserUseCase<U> {
    pub async fn execute(&self, event: &Event) -> Result<ProvisionOutcome, AuthServiceError> {
        match event {
            Event::StudentCreated(p) => {
                self.provision(
                    UserRole::Student,
                    &p.student_id,
                    &p.email,
                    display_name_from_email(&p.email),
                )
                .await
            }
            Event::TeacherCreated(p) => {
                self.provision(
                    UserRole::Teacher,
                    &p.teacher_id,
                    &p.email,
                    format!("{} {}", p.first_name, p.last_name),
                )
                .await
            }
            Event::ParentCreated(p) => {
                self.provision(
                    UserRole::Parent,
                    &p.parent_id,
                    &p.email,
                    display_name_from_email(&p.email),
                )
                .await
            }
            Event::PasswordReset(_) | Event::EmailVerification(_) => Ok(ProvisionOutcome::Ignored),
        }
    }

    async fn provision(
        &self,
        role: UserRole,
        external_id: &str,
        email: &str,
        name: String,
    ) -> Result<ProvisionOutcome, AuthServiceError> {
        if let Some(existing) = self.users.find_by_external_id(role, external_id).await? {
            return Ok(ProvisionOutcome::AlreadyProvisioned(existing.id));
        }
        // Same email under a different external entity is a real conflict,
        // not a redelivery — let it fail into the dead-letter path.
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthServiceError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name,
            email: email.to_owned(),
            password_hash: None,
            role,
            is_activated: false,
            external_id: Some(external_id.to_owned()),
            created_at: now,
            updated_at: now,
        };

        let (token, outbox_event) = mint_verification(&user, &self.verification_secret)?;
        self.users
            .create_with_verification_and_outbox(&user, &token, &outbox_event)
            .await?;
        Ok(ProvisionOutcome::Created(user.id))
    }
}

fn display_name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_owned()
}
