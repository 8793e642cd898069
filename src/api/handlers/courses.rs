use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::RemovalResponse;
use crate::api::{AppState, JsonBody, ResourceId};
use crate::error::AppResult;
use crate::models::{Course, CreateCourseRequest, UpdateCourseRequest};

#[derive(Serialize)]
pub struct CourseResponse {
    #[serde(rename = "mensagem", skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(rename = "curso")]
    course: Course,
}

#[derive(Serialize)]
pub struct CourseList {
    #[serde(rename = "cursos")]
    courses: Vec<Course>,
    total: usize,
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<CourseResponse>)> {
    let course = state.courses.create(request.validate()?)?;
    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            message: Some("Curso cadastrado com sucesso"),
            course,
        }),
    ))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<CourseList>> {
    let courses = state.courses.list()?;
    Ok(Json(CourseList {
        total: courses.len(),
        courses,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<CourseResponse>> {
    let course = state.courses.get(id)?;
    Ok(Json(CourseResponse {
        message: None,
        course,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateCourseRequest>,
) -> AppResult<Json<CourseResponse>> {
    let course = state.courses.update(request.validate()?)?;
    Ok(Json(CourseResponse {
        message: Some("Curso atualizado com sucesso"),
        course,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<RemovalResponse>> {
    let deletion = state.courses.delete(id)?;
    Ok(Json(RemovalResponse::new("Curso", deletion)))
}
