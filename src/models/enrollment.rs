use serde::{Deserialize, Serialize};

use super::{present_id, Course, CourseSummary, Student, StudentSummary};
use crate::error::{AppError, AppResult};

const ENROLLMENT_FIELDS_REQUIRED: &str = "aluno_id e curso_id são obrigatórios";

/// A newly created enrollment, annotated with the student's name and the
/// course's title for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    #[serde(rename = "aluno_id")]
    pub student_id: i64,
    #[serde(rename = "aluno_nome")]
    pub student_name: String,
    #[serde(rename = "curso_id")]
    pub course_id: i64,
    #[serde(rename = "curso_titulo")]
    pub course_title: String,
}

/// A course reached through one of a student's enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: Course,
    #[serde(rename = "matricula_id")]
    pub enrollment_id: i64,
}

/// A student reached through one of a course's enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledStudent {
    #[serde(flatten)]
    pub student: Student,
    #[serde(rename = "matricula_id")]
    pub enrollment_id: i64,
}

/// Every course a student is enrolled in, ordered by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourses {
    #[serde(rename = "aluno")]
    pub student: StudentSummary,
    #[serde(rename = "cursos")]
    pub courses: Vec<EnrolledCourse>,
    #[serde(rename = "total_cursos")]
    pub total: usize,
}

/// Every student enrolled in a course, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStudents {
    #[serde(rename = "curso")]
    pub course: CourseSummary,
    #[serde(rename = "alunos")]
    pub students: Vec<EnrolledStudent>,
    #[serde(rename = "total_alunos")]
    pub total: usize,
}

/// One row of the full enrollment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentListing {
    #[serde(rename = "matricula_id")]
    pub enrollment_id: i64,
    #[serde(rename = "aluno")]
    pub student: StudentSummary,
    #[serde(rename = "curso")]
    pub course: CourseSummary,
}

/// Body of `POST /matriculas`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentRequest {
    #[serde(rename = "aluno_id")]
    pub student_id: Option<i64>,
    #[serde(rename = "curso_id")]
    pub course_id: Option<i64>,
}

impl EnrollmentRequest {
    /// Returns `(student_id, course_id)`.
    pub fn validate(self) -> AppResult<(i64, i64)> {
        match (present_id(self.student_id), present_id(self.course_id)) {
            (Some(student_id), Some(course_id)) => Ok((student_id, course_id)),
            _ => Err(AppError::Validation(ENROLLMENT_FIELDS_REQUIRED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_requires_both_ids() {
        let request: EnrollmentRequest = serde_json::from_str(r#"{"aluno_id": 1}"#).unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "aluno_id e curso_id são obrigatórios");
    }

    #[test]
    fn enrolled_course_flattens_course_fields() {
        let enrolled = EnrolledCourse {
            course: Course {
                id: 4,
                title: "Rust".into(),
                description: "Sistemas".into(),
            },
            enrollment_id: 9,
        };
        assert_eq!(
            serde_json::to_value(&enrolled).unwrap(),
            serde_json::json!({"id": 4, "titulo": "Rust", "descricao": "Sistemas", "matricula_id": 9})
        );
    }
}
