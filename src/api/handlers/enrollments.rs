use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::{AppState, JsonBody, ResourceId};
use crate::error::AppResult;
use crate::models::{
    CourseStudents, Enrollment, EnrollmentListing, EnrollmentRequest, StudentCourses,
};

#[derive(Serialize)]
pub struct EnrollmentResponse {
    #[serde(rename = "mensagem")]
    message: String,
    #[serde(rename = "matricula")]
    enrollment: Enrollment,
}

#[derive(Serialize)]
pub struct EnrollmentList {
    #[serde(rename = "matriculas")]
    enrollments: Vec<EnrollmentListing>,
    total: usize,
}

pub async fn enroll(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<EnrollmentRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentResponse>)> {
    let (student_id, course_id) = request.validate()?;
    let enrollment = state.enrollments.enroll(student_id, course_id)?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse {
            message: format!(
                "Aluno \"{}\" matriculado no curso \"{}\" com sucesso",
                enrollment.student_name, enrollment.course_title
            ),
            enrollment,
        }),
    ))
}

pub async fn courses_for_student(
    State(state): State<AppState>,
    ResourceId(student_id): ResourceId,
) -> AppResult<Json<StudentCourses>> {
    state.enrollments.courses_for_student(student_id).map(Json)
}

pub async fn students_for_course(
    State(state): State<AppState>,
    ResourceId(course_id): ResourceId,
) -> AppResult<Json<CourseStudents>> {
    state.enrollments.students_for_course(course_id).map(Json)
}

pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<EnrollmentList>> {
    let enrollments = state.enrollments.list_all()?;
    Ok(Json(EnrollmentList {
        total: enrollments.len(),
        enrollments,
    }))
}
