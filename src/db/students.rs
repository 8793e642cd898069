use rusqlite::Row;

use super::{Database, DbError, Tx};
use crate::error::{AppError, AppResult, Conflict, Resource};
use crate::models::{CascadeDeletion, NewStudent, Student, StudentUpdate};

/// CRUD over `alunos`.
///
/// Email uniqueness is enforced by the table's UNIQUE constraint; its
/// violation is the only signal used to report [`Conflict::DuplicateEmail`].
#[derive(Clone)]
pub struct StudentRepo {
    db: Database,
}

impl StudentRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, input: NewStudent) -> AppResult<Student> {
        let id = self.db.transaction(|tx| {
            tx.insert(
                "INSERT INTO alunos (nome, email) VALUES (?, ?)",
                (input.name(), input.email()),
            )
            .map_err(|e| AppError::from_write(e, Conflict::DuplicateEmail))
        })?;

        tracing::info!(student_id = id, "student registered");

        Ok(Student {
            id,
            name: input.name().to_owned(),
            email: input.email().to_owned(),
        })
    }

    /// All students ordered by name.
    pub fn list(&self) -> AppResult<Vec<Student>> {
        let students = self.db.read(|tx| {
            tx.query(
                "SELECT id, nome, email FROM alunos ORDER BY nome, id",
                [],
                map_student,
            )
        })?;
        Ok(students)
    }

    pub fn get(&self, id: i64) -> AppResult<Student> {
        self.db
            .read(|tx| find(tx, id))?
            .ok_or(AppError::NotFound(Resource::Student))
    }

    /// Overwrite name and email, answering with the submitted values.
    ///
    /// Fails with not found both when the id is unknown up front and when
    /// the UPDATE itself touches no row.
    pub fn update(&self, update: StudentUpdate) -> AppResult<Student> {
        self.db.transaction(|tx| {
            if find(tx, update.id())?.is_none() {
                return Err(AppError::NotFound(Resource::Student));
            }

            let affected = tx
                .execute(
                    "UPDATE alunos SET nome = ?, email = ? WHERE id = ?",
                    (update.name(), update.email(), update.id()),
                )
                .map_err(|e| AppError::from_write(e, Conflict::DuplicateEmail))?;
            if affected == 0 {
                return Err(AppError::NotFound(Resource::Student));
            }
            Ok(())
        })?;

        tracing::info!(student_id = update.id(), "student updated");
        Ok(update.into_student())
    }

    /// Delete a student and, in the same transaction, every enrollment
    /// referencing it.
    pub fn delete(&self, id: i64) -> AppResult<CascadeDeletion> {
        let deletion = self.db.transaction(|tx| {
            let student = find(tx, id)?.ok_or(AppError::NotFound(Resource::Student))?;

            let removed_enrollments =
                tx.execute("DELETE FROM matriculas WHERE aluno_id = ?", [id])?;
            tx.execute("DELETE FROM alunos WHERE id = ?", [id])?;

            Ok::<_, AppError>(CascadeDeletion {
                label: student.name,
                removed_enrollments,
            })
        })?;

        tracing::info!(
            student_id = id,
            removed_enrollments = deletion.removed_enrollments,
            "student removed"
        );
        Ok(deletion)
    }
}

pub(super) fn find(tx: &Tx<'_>, id: i64) -> Result<Option<Student>, DbError> {
    tx.query_opt(
        "SELECT id, nome, email FROM alunos WHERE id = ?",
        [id],
        map_student,
    )
}

fn map_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}
