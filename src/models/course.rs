use serde::{Deserialize, Serialize};

use super::{present, present_id};
use crate::error::{AppError, AppResult};

const CREATE_FIELDS_REQUIRED: &str = "Título e descrição são obrigatórios";
const UPDATE_FIELDS_REQUIRED: &str = "ID, título e descrição são obrigatórios";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Short form used when a course is nested inside another response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
        }
    }
}

/// Validated input for creating a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    title: String,
    description: String,
}

impl NewCourse {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> AppResult<Self> {
        let (title, description) = (title.into(), description.into());
        if title.is_empty() || description.is_empty() {
            return Err(AppError::Validation(CREATE_FIELDS_REQUIRED));
        }
        Ok(Self { title, description })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Validated input for overwriting a course's title and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseUpdate {
    id: i64,
    title: String,
    description: String,
}

impl CourseUpdate {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        let (title, description) = (title.into(), description.into());
        if id == 0 || title.is_empty() || description.is_empty() {
            return Err(AppError::Validation(UPDATE_FIELDS_REQUIRED));
        }
        Ok(Self {
            id,
            title,
            description,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn into_course(self) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
        }
    }
}

/// Body of `POST /cursos/novocurso`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

impl CreateCourseRequest {
    pub fn validate(self) -> AppResult<NewCourse> {
        match (present(self.title), present(self.description)) {
            (Some(title), Some(description)) => NewCourse::new(title, description),
            _ => Err(AppError::Validation(CREATE_FIELDS_REQUIRED)),
        }
    }
}

/// Body of `PUT /cursos/atualizacurso`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourseRequest {
    pub id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

impl UpdateCourseRequest {
    pub fn validate(self) -> AppResult<CourseUpdate> {
        match (
            present_id(self.id),
            present(self.title),
            present(self.description),
        ) {
            (Some(id), Some(title), Some(description)) => CourseUpdate::new(id, title, description),
            _ => Err(AppError::Validation(UPDATE_FIELDS_REQUIRED)),
        }
    }
}
