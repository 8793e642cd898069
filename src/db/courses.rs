use rusqlite::Row;

use super::{Database, DbError, Tx};
use crate::error::{AppError, AppResult, Conflict, Resource};
use crate::models::{CascadeDeletion, Course, CourseUpdate, NewCourse};

/// CRUD over `cursos`. Titles and descriptions carry no uniqueness constraint.
#[derive(Clone)]
pub struct CourseRepo {
    db: Database,
}

impl CourseRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, input: NewCourse) -> AppResult<Course> {
        let id = self.db.transaction(|tx| {
            tx.insert(
                "INSERT INTO cursos (titulo, descricao) VALUES (?, ?)",
                (input.title(), input.description()),
            )
            .map_err(|e| AppError::from_write(e, Conflict::Integrity))
        })?;

        tracing::info!(course_id = id, "course created");

        Ok(Course {
            id,
            title: input.title().to_owned(),
            description: input.description().to_owned(),
        })
    }

    /// All courses ordered by title.
    pub fn list(&self) -> AppResult<Vec<Course>> {
        let courses = self.db.read(|tx| {
            tx.query(
                "SELECT id, titulo, descricao FROM cursos ORDER BY titulo, id",
                [],
                map_course,
            )
        })?;
        Ok(courses)
    }

    pub fn get(&self, id: i64) -> AppResult<Course> {
        self.db
            .read(|tx| find(tx, id))?
            .ok_or(AppError::NotFound(Resource::Course))
    }

    pub fn update(&self, update: CourseUpdate) -> AppResult<Course> {
        self.db.transaction(|tx| {
            if find(tx, update.id())?.is_none() {
                return Err(AppError::NotFound(Resource::Course));
            }

            let affected = tx
                .execute(
                    "UPDATE cursos SET titulo = ?, descricao = ? WHERE id = ?",
                    (update.title(), update.description(), update.id()),
                )
                .map_err(|e| AppError::from_write(e, Conflict::Integrity))?;
            if affected == 0 {
                return Err(AppError::NotFound(Resource::Course));
            }
            Ok(())
        })?;

        tracing::info!(course_id = update.id(), "course updated");
        Ok(update.into_course())
    }

    pub fn delete(&self, id: i64) -> AppResult<CascadeDeletion> {
        let deletion = self.db.transaction(|tx| {
            let course = find(tx, id)?.ok_or(AppError::NotFound(Resource::Course))?;

            let removed_enrollments =
                tx.execute("DELETE FROM matriculas WHERE curso_id = ?", [id])?;
            tx.execute("DELETE FROM cursos WHERE id = ?", [id])?;

            Ok::<_, AppError>(CascadeDeletion {
                label: course.title,
                removed_enrollments,
            })
        })?;

        tracing::info!(
            course_id = id,
            removed_enrollments = deletion.removed_enrollments,
            "course removed"
        );
        Ok(deletion)
    }
}

pub(super) fn find(tx: &Tx<'_>, id: i64) -> Result<Option<Course>, DbError> {
    tx.query_opt(
        "SELECT id, titulo, descricao FROM cursos WHERE id = ?",
        [id],
        map_course,
    )
}

fn map_course(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}
