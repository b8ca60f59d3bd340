use campus_auth::error::AuthServiceError;
use campus_auth::usecase::login::{LoginInput, LoginUseCase};
use campus_auth::usecase::register::{RegisterInput, RegisterUseCase};
use campus_auth_types::token::validate_access_token;
use campus_domain::user::UserRole;

use crate::helpers::{MockDb, TEST_ACCESS_SECRET, activated_user, test_secrets, unactivated_user};

fn register_usecase(db: &MockDb) -> RegisterUseCase<MockDb, MockDb> {
    RegisterUseCase {
        users: db.clone(),
        refresh_tokens: db.clone(),
        secrets: test_secrets(),
    }
}

fn login_usecase(db: &MockDb) -> LoginUseCase<MockDb, MockDb> {
    LoginUseCase {
        users: db.clone(),
        refresh_tokens: db.clone(),
        secrets: test_secrets(),
    }
}

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        name: "Amelia Chen".to_owned(),
        email: email.to_owned(),
        password: "correct horse battery".to_owned(),
        role: UserRole::Student,
    }
}

#[tokio::test]
async fn should_register_user_with_verification_and_outbox() {
    let db = MockDb::default();

    let output = register_usecase(&db)
        .execute(register_input("amelia@campus.test"))
        .await
        .unwrap();

    let users = db.users.lock().unwrap().clone();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, output.user_id);
    assert_eq!(users[0].email, "amelia@campus.test");
    assert!(!users[0].is_activated);
    assert!(users[0].password_hash.is_some());

    // The verification token and its outbox event were written alongside.
    assert_eq!(db.verification_tokens.lock().unwrap().len(), 1);
    assert_eq!(db.outbox_kinds(), vec!["auth.user.email_verification"]);

    // One refresh row and a validatable access token.
    assert_eq!(db.refresh_tokens.lock().unwrap().len(), 1);
    let info = validate_access_token(&output.session.access_token, TEST_ACCESS_SECRET).unwrap();
    assert_eq!(info.user_id, output.user_id);
    assert_eq!(info.user_role, UserRole::Student.as_u8());
}

#[tokio::test]
async fn should_reject_register_with_duplicate_email() {
    let db = MockDb::with_user(activated_user("amelia@campus.test", "pw"));

    let err = register_usecase(&db)
        .execute(register_input("amelia@campus.test"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::DuplicateEmail));
    assert_eq!(db.users.lock().unwrap().len(), 1);
    assert!(db.outbox.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_login_activated_user() {
    let user = activated_user("amelia@campus.test", "correct horse battery");
    let db = MockDb::with_user(user.clone());

    let output = login_usecase(&db)
        .execute(LoginInput {
            email: "amelia@campus.test".to_owned(),
            password: "correct horse battery".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(output.user_id, user.id);
    assert_eq!(db.refresh_tokens.lock().unwrap().len(), 1);
    let info = validate_access_token(&output.session.access_token, TEST_ACCESS_SECRET).unwrap();
    assert_eq!(info.email, "amelia@campus.test");
}

#[tokio::test]
async fn should_reject_login_with_wrong_password() {
    let db = MockDb::with_user(activated_user("amelia@campus.test", "correct horse battery"));

    let err = login_usecase(&db)
        .execute(LoginInput {
            email: "amelia@campus.test".to_owned(),
            password: "wrong password".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}

#[tokio::test]
async fn should_reject_login_for_unknown_email() {
    let db = MockDb::default();

    let err = login_usecase(&db)
        .execute(LoginInput {
            email: "nobody@campus.test".to_owned(),
            password: "whatever".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}

#[tokio::test]
async fn should_reject_login_for_unactivated_account() {
    let db = MockDb::with_user(unactivated_user("amelia@campus.test", "correct horse battery"));

    let err = login_usecase(&db)
        .execute(LoginInput {
            email: "amelia@campus.test".to_owned(),
            password: "correct horse battery".to_owned(),
        })
        .await
        .unwrap_err();

    // Right password, unverified account: 403, no tokens.
    assert!(matches!(err, AuthServiceError::NotActivated));
    assert!(db.refresh_tokens.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_login_for_shadow_user_without_password() {
    let mut user = activated_user("shadow@campus.test", "irrelevant");
    user.password_hash = None;
    let db = MockDb::with_user(user);

    let err = login_usecase(&db)
        .execute(LoginInput {
            email: "shadow@campus.test".to_owned(),
            password: "irrelevant".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}
