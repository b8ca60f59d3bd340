use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::serde::to_rfc3339_ms;

use crate::domain::types::Teacher;
use crate::error::TeacherServiceError;
use crate::handlers::{admin_only, authenticated};
use crate::state::AppState;
use crate::usecase::teacher::{
    CreateTeacherInput, CreateTeacherUseCase, GetTeacherUseCase, ListTeachersUseCase,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Teacher> for TeacherResponse {
    fn from(t: Teacher) -> Self {
        Self {
            id: t.id,
            first_name: t.first_name,
            last_name: t.last_name,
            email: t.email,
            phone: t.phone,
            created_at: t.created_at,
        }
    }
}

pub async fn create_teacher(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<impl IntoResponse, TeacherServiceError> {
    admin_only(&jar, &state.access_token_secret)?;

    let usecase = CreateTeacherUseCase {
        teachers: state.teacher_repo(),
    };
    let teacher = usecase
        .execute(CreateTeacherInput {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TeacherResponse::from(teacher))))
}

pub async fn list_teachers(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, TeacherServiceError> {
    authenticated(&jar, &state.access_token_secret)?;

    let usecase = ListTeachersUseCase {
        teachers: state.teacher_repo(),
    };
    let teachers = usecase.execute().await?;
    let body: Vec<TeacherResponse> = teachers.into_iter().map(TeacherResponse::from).collect();
    Ok(Json(body))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, TeacherServiceError> {
    authenticated(&jar, &state.access_token_secret)?;

    let usecase = GetTeacherUseCase {
        teachers: state.teacher_repo(),
    };
    let teacher = usecase.execute(id).await?;
    Ok(Json(TeacherResponse::from(teacher)))
}
