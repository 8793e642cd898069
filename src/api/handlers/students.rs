use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::RemovalResponse;
use crate::api::{AppState, JsonBody, ResourceId};
use crate::error::AppResult;
use crate::models::{CreateStudentRequest, Student, UpdateStudentRequest};

#[derive(Serialize)]
pub struct StudentResponse {
    #[serde(rename = "mensagem", skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(rename = "aluno")]
    student: Student,
}

#[derive(Serialize)]
pub struct StudentList {
    #[serde(rename = "alunos")]
    students: Vec<Student>,
    total: usize,
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateStudentRequest>,
) -> AppResult<(StatusCode, Json<StudentResponse>)> {
    let student = state.students.create(request.validate()?)?;
    Ok((
        StatusCode::CREATED,
        Json(StudentResponse {
            message: Some("Aluno cadastrado com sucesso"),
            student,
        }),
    ))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<StudentList>> {
    let students = state.students.list()?;
    Ok(Json(StudentList {
        total: students.len(),
        students,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<StudentResponse>> {
    let student = state.students.get(id)?;
    Ok(Json(StudentResponse {
        message: None,
        student,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateStudentRequest>,
) -> AppResult<Json<StudentResponse>> {
    let student = state.students.update(request.validate()?)?;
    Ok(Json(StudentResponse {
        message: Some("Aluno atualizado com sucesso"),
        student,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<RemovalResponse>> {
    let deletion = state.students.delete(id)?;
    Ok(Json(RemovalResponse::new("Aluno", deletion)))
}
