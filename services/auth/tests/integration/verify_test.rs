use chrono::Utc;
use uuid::Uuid;

use campus_auth::error::AuthServiceError;
use campus_auth::usecase::token::issue_verification_token;
use campus_auth::usecase::verify::{
    ConfirmVerificationUseCase, SendVerificationOutcome, SendVerificationUseCase,
};

use crate::helpers::{MockDb, TEST_VERIFICATION_SECRET, activated_user, unactivated_user};

fn send_usecase(db: &MockDb) -> SendVerificationUseCase<MockDb, MockDb> {
    SendVerificationUseCase {
        users: db.clone(),
        verification_tokens: db.clone(),
        verification_secret: TEST_VERIFICATION_SECRET.to_owned(),
    }
}

fn confirm_usecase(db: &MockDb) -> ConfirmVerificationUseCase<MockDb, MockDb> {
    ConfirmVerificationUseCase {
        users: db.clone(),
        verification_tokens: db.clone(),
        verification_secret: TEST_VERIFICATION_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_send_verification_for_unactivated_user() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());

    let outcome = send_usecase(&db).execute(user.id).await.unwrap();

    assert_eq!(outcome, SendVerificationOutcome::Sent);
    assert_eq!(db.verification_tokens.lock().unwrap().len(), 1);
    assert_eq!(db.outbox_kinds(), vec!["auth.user.email_verification"]);
}

#[tokio::test]
async fn should_report_already_verified_without_minting() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());

    let outcome = send_usecase(&db).execute(user.id).await.unwrap();

    assert_eq!(outcome, SendVerificationOutcome::AlreadyVerified);
    assert!(db.verification_tokens.lock().unwrap().is_empty());
    assert!(db.outbox.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fail_send_for_unknown_user() {
    let db = MockDb::default();

    let err = send_usecase(&db).execute(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::UserNotFound));
}

#[tokio::test]
async fn should_confirm_verification_and_activate_account() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    send_usecase(&db).execute(user.id).await.unwrap();
    let token_value = db.verification_tokens.lock().unwrap()[0].token.clone();

    let confirmed_id = confirm_usecase(&db).execute(&token_value).await.unwrap();

    assert_eq!(confirmed_id, user.id);
    assert!(db.users.lock().unwrap()[0].is_activated);
    assert!(db.verification_tokens.lock().unwrap()[0].used);
}

#[tokio::test]
async fn should_reject_second_confirmation_with_same_token() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    send_usecase(&db).execute(user.id).await.unwrap();
    let token_value = db.verification_tokens.lock().unwrap()[0].token.clone();

    confirm_usecase(&db).execute(&token_value).await.unwrap();
    // The signature still verifies, but the row is consumed.
    let err = confirm_usecase(&db).execute(&token_value).await.unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidVerificationToken));
}

#[tokio::test]
async fn should_reject_token_signed_with_wrong_secret() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let (forged, _) = issue_verification_token(user.id, "not-the-verification-secret").unwrap();

    let err = confirm_usecase(&db).execute(&forged).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidVerificationToken));
}

#[tokio::test]
async fn should_reject_token_at_exact_expiry() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    send_usecase(&db).execute(user.id).await.unwrap();
    let token_value = {
        let mut tokens = db.verification_tokens.lock().unwrap();
        // Expiry is strict: a row whose expires_at has just passed is dead
        // even while the JWT is still inside its clock-skew leeway.
        tokens[0].expires_at = Utc::now();
        tokens[0].token.clone()
    };

    let err = confirm_usecase(&db).execute(&token_value).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidVerificationToken));
    assert!(!db.users.lock().unwrap()[0].is_activated);
}

#[tokio::test]
async fn should_reject_token_whose_subject_does_not_match_row() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    send_usecase(&db).execute(user.id).await.unwrap();
    let token_value = {
        let mut tokens = db.verification_tokens.lock().unwrap();
        tokens[0].user_id = Uuid::new_v4();
        tokens[0].token.clone()
    };

    let err = confirm_usecase(&db).execute(&token_value).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidVerificationToken));
}

#[tokio::test]
async fn should_keep_earlier_tokens_usable_after_resend() {
    let user = unactivated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    send_usecase(&db).execute(user.id).await.unwrap();
    send_usecase(&db).execute(user.id).await.unwrap();
    let first = db.verification_tokens.lock().unwrap()[0].token.clone();

    let confirmed_id = confirm_usecase(&db).execute(&first).await.unwrap();
    assert_eq!(confirmed_id, user.id);
}
