use chrono::{Duration, Utc};

use campus_auth::error::AuthServiceError;
use campus_auth::usecase::token::{
    LogoutUseCase, RefreshAccessTokenUseCase, issue_refresh_token, issue_session,
};
use campus_auth_types::token::validate_access_token;

use crate::helpers::{
    MockDb, TEST_ACCESS_SECRET, TEST_REFRESH_SECRET, activated_user, refresh_row, test_secrets,
};

fn refresh_usecase(db: &MockDb) -> RefreshAccessTokenUseCase<MockDb, MockDb> {
    RefreshAccessTokenUseCase {
        users: db.clone(),
        refresh_tokens: db.clone(),
        secrets: test_secrets(),
    }
}

#[tokio::test]
async fn should_refresh_access_token_with_valid_refresh_token() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let session = issue_session(&db, &user, &test_secrets()).await.unwrap();

    let output = refresh_usecase(&db)
        .execute(&session.refresh_token)
        .await
        .unwrap();

    assert_eq!(output.user_id, user.id);
    let info = validate_access_token(&output.access_token, TEST_ACCESS_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    // The refresh token is not rotated; the original row is still there.
    assert_eq!(db.refresh_tokens.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_refresh_token_signed_with_wrong_secret() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let row = refresh_row(user.id);
    db.refresh_tokens.lock().unwrap().push(row.clone());

    let forged = issue_refresh_token(&user, row.id, "not-the-refresh-secret").unwrap();

    let err = refresh_usecase(&db).execute(&forged).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidRefreshToken));
}

#[tokio::test]
async fn should_reject_refresh_when_row_is_missing() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    // Valid signature, but the row it names was never persisted (or was
    // deleted by logout).
    let token = issue_refresh_token(&user, uuid::Uuid::new_v4(), TEST_REFRESH_SECRET).unwrap();

    let err = refresh_usecase(&db).execute(&token).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidRefreshToken));
}

#[tokio::test]
async fn should_reject_refresh_when_row_is_revoked() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let mut row = refresh_row(user.id);
    row.revoked = true;
    db.refresh_tokens.lock().unwrap().push(row.clone());
    let token = issue_refresh_token(&user, row.id, TEST_REFRESH_SECRET).unwrap();

    let err = refresh_usecase(&db).execute(&token).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidRefreshToken));
}

#[tokio::test]
async fn should_reject_refresh_when_row_is_expired() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let mut row = refresh_row(user.id);
    row.expires_at = Utc::now() - Duration::seconds(1);
    db.refresh_tokens.lock().unwrap().push(row.clone());
    let token = issue_refresh_token(&user, row.id, TEST_REFRESH_SECRET).unwrap();

    let err = refresh_usecase(&db).execute(&token).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidRefreshToken));
}

#[tokio::test]
async fn should_keep_single_refresh_row_per_user() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());

    issue_session(&db, &user, &test_secrets()).await.unwrap();
    issue_session(&db, &user, &test_secrets()).await.unwrap();

    assert_eq!(db.refresh_tokens.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_delete_refresh_row_on_logout() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let session = issue_session(&db, &user, &test_secrets()).await.unwrap();

    let usecase = LogoutUseCase {
        refresh_tokens: db.clone(),
        refresh_secret: TEST_REFRESH_SECRET.to_owned(),
    };
    usecase.execute(&session.refresh_token).await.unwrap();

    assert!(db.refresh_tokens.lock().unwrap().is_empty());
    // The deleted token no longer refreshes anything.
    let err = refresh_usecase(&db)
        .execute(&session.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidRefreshToken));
}

#[tokio::test]
async fn should_tolerate_logout_of_already_absent_row() {
    let user = activated_user("amelia@campus.test", "pw");
    let db = MockDb::with_user(user.clone());
    let token = issue_refresh_token(&user, uuid::Uuid::new_v4(), TEST_REFRESH_SECRET).unwrap();

    let usecase = LogoutUseCase {
        refresh_tokens: db.clone(),
        refresh_secret: TEST_REFRESH_SECRET.to_owned(),
    };
    usecase.execute(&token).await.unwrap();
}
