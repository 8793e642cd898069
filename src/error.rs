//! Error taxonomy shared by the repositories and the HTTP layer.
//!
//! Every failure a public operation can report is one of four kinds:
//! validation (a required field is missing), not found (a referenced id does
//! not resolve), conflict (a storage-level uniqueness or integrity violation)
//! or internal (anything else the store reports). The router adds one more,
//! [`AppError::MethodNotAllowed`], for a known path hit with the wrong verb.

use thiserror::Error;

use crate::db::DbError;

/// An entity that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Student,
    Course,
    /// An unknown route, or a path id that is not an integer.
    Endpoint,
}

impl Resource {
    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::Student => "Aluno não encontrado",
            Resource::Course => "Curso não encontrado",
            Resource::Endpoint => "Recurso não encontrado",
        }
    }
}

/// The storage constraint a write tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    DuplicateEmail,
    AlreadyEnrolled,
    /// Any other constraint violation, e.g. a parent row deleted mid-request.
    Integrity,
}

impl Conflict {
    pub fn message(self) -> &'static str {
        match self {
            Conflict::DuplicateEmail => "Este email já está cadastrado",
            Conflict::AlreadyEnrolled => "Aluno já está matriculado neste curso",
            Conflict::Integrity => "Erro de integridade no banco de dados",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{}", .0.not_found_message())]
    NotFound(Resource),

    #[error("{}", .0.message())]
    Conflict(Conflict),

    /// A known path requested with a method it does not serve.
    #[error("Método não permitido")]
    MethodNotAllowed,

    #[error("database error: {0}")]
    Internal(#[from] DbError),
}

impl AppError {
    /// Classify a failed write: uniqueness violations become `unique`,
    /// other constraint violations become [`Conflict::Integrity`], and
    /// everything else stays internal.
    pub fn from_write(err: DbError, unique: Conflict) -> Self {
        if err.is_unique_violation() {
            AppError::Conflict(unique)
        } else if err.is_constraint_violation() {
            AppError::Conflict(Conflict::Integrity)
        } else {
            AppError::Internal(err)
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            AppError::NotFound(Resource::Course).to_string(),
            "Curso não encontrado"
        );
        assert_eq!(
            AppError::Conflict(Conflict::DuplicateEmail).to_string(),
            "Este email já está cadastrado"
        );
        assert_eq!(
            AppError::Validation("Nome e email são obrigatórios").to_string(),
            "Nome e email são obrigatórios"
        );
    }

    #[test]
    fn non_constraint_write_failures_stay_internal() {
        let err = DbError::Sqlite(rusqlite::Error::InvalidQuery);
        let mapped = AppError::from_write(err, Conflict::DuplicateEmail);
        assert!(matches!(mapped, AppError::Internal(_)));
    }

    #[test]
    fn foreign_key_violation_is_an_integrity_conflict() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE alunos (id INTEGER PRIMARY KEY);
             CREATE TABLE matriculas (aluno_id INTEGER NOT NULL REFERENCES alunos(id));",
        )
        .unwrap();

        let err = conn
            .execute("INSERT INTO matriculas (aluno_id) VALUES (7)", [])
            .unwrap_err();
        let mapped = AppError::from_write(DbError::from(err), Conflict::AlreadyEnrolled);

        assert!(matches!(mapped, AppError::Conflict(Conflict::Integrity)));
    }
}
