use uuid::Uuid;

use campus_teacher::error::TeacherServiceError;
use campus_teacher::usecase::teacher::{
    CreateTeacherInput, CreateTeacherUseCase, GetTeacherUseCase, ListTeachersUseCase,
};

use crate::helpers::MockDb;

fn input(email: &str) -> CreateTeacherInput {
    CreateTeacherInput {
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: email.to_owned(),
        phone: Some("+1-555-0100".to_owned()),
    }
}

#[tokio::test]
async fn should_create_teacher_with_outbox_event() {
    let db = MockDb::default();
    let usecase = CreateTeacherUseCase {
        teachers: db.clone(),
    };

    let teacher = usecase.execute(input("jane@campus.test")).await.unwrap();

    assert_eq!(db.teachers.lock().unwrap().len(), 1);
    let outbox = db.outbox.lock().unwrap().clone();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, "teacher.created");
    assert_eq!(
        outbox[0].idempotency_key,
        format!("teacher.created:{}", teacher.id)
    );
    assert_eq!(outbox[0].payload["teacherId"], teacher.id.to_string());
    assert_eq!(outbox[0].payload["email"], "jane@campus.test");
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let db = MockDb::default();
    let usecase = CreateTeacherUseCase {
        teachers: db.clone(),
    };
    usecase.execute(input("jane@campus.test")).await.unwrap();

    let err = usecase.execute(input("jane@campus.test")).await.unwrap_err();

    assert!(matches!(err, TeacherServiceError::DuplicateEmail));
    assert_eq!(db.teachers.lock().unwrap().len(), 1);
    // No second event for the failed attempt.
    assert_eq!(db.outbox.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_created_teachers() {
    let db = MockDb::default();
    let create = CreateTeacherUseCase {
        teachers: db.clone(),
    };
    create.execute(input("jane@campus.test")).await.unwrap();
    create.execute(input("john@campus.test")).await.unwrap();

    let list = ListTeachersUseCase {
        teachers: db.clone(),
    };
    let teachers = list.execute().await.unwrap();

    assert_eq!(teachers.len(), 2);
}

#[tokio::test]
async fn should_get_teacher_by_id() {
    let db = MockDb::default();
    let create = CreateTeacherUseCase {
        teachers: db.clone(),
    };
    let created = create.execute(input("jane@campus.test")).await.unwrap();

    let get = GetTeacherUseCase {
        teachers: db.clone(),
    };
    let found = get.execute(created.id).await.unwrap();

    assert_eq!(found.id, created.id);
    assert_eq!(found.email, "jane@campus.test");
}

#[tokio::test]
async fn should_fail_get_for_unknown_id() {
    let db = MockDb::default();
    let get = GetTeacherUseCase {
        teachers: db.clone(),
    };

    let err = get.execute(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, TeacherServiceError::TeacherNotFound));
}
