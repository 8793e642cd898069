use serde::{Deserialize, Serialize};

use super::{present, present_id};
use crate::error::{AppError, AppResult};

const CREATE_FIELDS_REQUIRED: &str = "Nome e email são obrigatórios";
const UPDATE_FIELDS_REQUIRED: &str = "ID, nome e email são obrigatórios";

/// A registered student. Emails are unique across all students, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// Short form used when a student is nested inside another response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
        }
    }
}

/// Validated input for registering a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    name: String,
    email: String,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> AppResult<Self> {
        let (name, email) = (name.into(), email.into());
        if name.is_empty() || email.is_empty() {
            return Err(AppError::Validation(CREATE_FIELDS_REQUIRED));
        }
        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Validated input for overwriting a student's name and email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentUpdate {
    id: i64,
    name: String,
    email: String,
}

impl StudentUpdate {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> AppResult<Self> {
        let (name, email) = (name.into(), email.into());
        if id == 0 || name.is_empty() || email.is_empty() {
            return Err(AppError::Validation(UPDATE_FIELDS_REQUIRED));
        }
        Ok(Self { id, name, email })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The student as submitted. Updates answer with this rather than a re-read.
    pub fn into_student(self) -> Student {
        Student {
            id: self.id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Body of `POST /alunos/novoaluno`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CreateStudentRequest {
    pub fn validate(self) -> AppResult<NewStudent> {
        match (present(self.name), present(self.email)) {
            (Some(name), Some(email)) => NewStudent::new(name, email),
            _ => Err(AppError::Validation(CREATE_FIELDS_REQUIRED)),
        }
    }
}

/// Body of `PUT /alunos/atualizaaluno`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudentRequest {
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateStudentRequest {
    pub fn validate(self) -> AppResult<StudentUpdate> {
        match (present_id(self.id), present(self.name), present(self.email)) {
            (Some(id), Some(name), Some(email)) => StudentUpdate::new(id, name, email),
            _ => Err(AppError::Validation(UPDATE_FIELDS_REQUIRED)),
        }
    }
}
