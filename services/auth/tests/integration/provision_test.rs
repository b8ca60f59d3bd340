use campus_auth::error::AuthServiceError;
use campus_auth::usecase::provision::{ProvisionOutcome, ProvisionUserUseCase};
use campus_domain::user::UserRole;
use campus_events::{Event, ParentCreated, PasswordReset, StudentCreated, TeacherCreated};

use crate::helpers::{MockDb, TEST_VERIFICATION_SECRET, activated_user};

fn usecase(db: &MockDb) -> ProvisionUserUseCase<MockDb> {
    ProvisionUserUseCase {
        users: db.clone(),
        verification_secret: TEST_VERIFICATION_SECRET.to_owned(),
    }
}

fn student_created() -> Event {
    Event::StudentCreated(StudentCreated {
        student_id: "s-101".to_owned(),
        email: "amelia@campus.test".to_owned(),
        parent_id: Some("p-55".to_owned()),
    })
}

#[tokio::test]
async fn should_provision_shadow_account_for_student() {
    let db = MockDb::default();

    let outcome = usecase(&db).execute(&student_created()).await.unwrap();

    let users = db.users.lock().unwrap().clone();
    assert_eq!(users.len(), 1);
    assert!(matches!(outcome, ProvisionOutcome::Created(id) if id == users[0].id));
    assert_eq!(users[0].role, UserRole::Student);
    assert_eq!(users[0].external_id.as_deref(), Some("s-101"));
    assert_eq!(users[0].name, "amelia");
    assert!(users[0].password_hash.is_none());
    assert!(!users[0].is_activated);

    // Provisioning queues exactly one verification mail.
    assert_eq!(db.verification_tokens.lock().unwrap().len(), 1);
    assert_eq!(db.outbox_kinds(), vec!["auth.user.email_verification"]);
}

#[tokio::test]
async fn should_skip_redelivered_creation_event() {
    let db = MockDb::default();

    let first = usecase(&db).execute(&student_created()).await.unwrap();
    let second = usecase(&db).execute(&student_created()).await.unwrap();

    let created_id = match first {
        ProvisionOutcome::Created(id) => id,
        other => panic!("expected Created, got {other:?}"),
    };
    assert_eq!(second, ProvisionOutcome::AlreadyProvisioned(created_id));
    assert_eq!(db.users.lock().unwrap().len(), 1);
    // No second verification mail on redelivery.
    assert_eq!(db.outbox.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_fail_when_email_belongs_to_different_entity() {
    let db = MockDb::with_user(activated_user("amelia@campus.test", "pw"));

    let err = usecase(&db).execute(&student_created()).await.unwrap_err();

    assert!(matches!(err, AuthServiceError::DuplicateEmail));
    assert_eq!(db.users.lock().unwrap().len(), 1);
    assert!(db.outbox.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_use_full_name_for_provisioned_teacher() {
    let db = MockDb::default();
    let event = Event::TeacherCreated(TeacherCreated {
        teacher_id: "t-7".to_owned(),
        email: "jane.doe@campus.test".to_owned(),
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
    });

    usecase(&db).execute(&event).await.unwrap();

    let users = db.users.lock().unwrap().clone();
    assert_eq!(users[0].name, "Jane Doe");
    assert_eq!(users[0].role, UserRole::Teacher);
    assert_eq!(users[0].external_id.as_deref(), Some("t-7"));
}

#[tokio::test]
async fn should_provision_parent_account() {
    let db = MockDb::default();
    let event = Event::ParentCreated(ParentCreated {
        parent_id: "p-55".to_owned(),
        email: "parent@campus.test".to_owned(),
    });

    let outcome = usecase(&db).execute(&event).await.unwrap();

    assert!(matches!(outcome, ProvisionOutcome::Created(_)));
    let users = db.users.lock().unwrap().clone();
    assert_eq!(users[0].role, UserRole::Parent);
    assert_eq!(users[0].name, "parent");
}

#[tokio::test]
async fn should_ignore_auth_service_events() {
    let db = MockDb::default();
    let event = Event::PasswordReset(PasswordReset {
        email: "amelia@campus.test".to_owned(),
        reset_token: "tok".to_owned(),
    });

    let outcome = usecase(&db).execute(&event).await.unwrap();

    assert_eq!(outcome, ProvisionOutcome::Ignored);
    assert!(db.users.lock().unwrap().is_empty());
}
