//! Enrollment integrity.
//!
//! An enrollment may only be created while both its student and its course
//! exist, and the (student, course) pair is unique. The pre-checks below
//! exist to pick the right error message; the table's UNIQUE and FOREIGN
//! KEY constraints are what actually hold the invariants under concurrent
//! writers.

use super::{courses, students, Database};
use crate::error::{AppError, AppResult, Conflict, Resource};
use crate::models::{
    Course, CourseStudents, CourseSummary, EnrolledCourse, EnrolledStudent, Enrollment,
    EnrollmentListing, EnrollmentRequest, Student, StudentCourses, StudentSummary,
};

#[derive(Clone)]
pub struct EnrollmentService {
    db: Database,
}

impl EnrollmentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Enroll a student in a course.
    ///
    /// Checks run in a fixed order and the first failure wins: missing ids,
    /// unknown student, unknown course, existing enrollment.
    pub fn enroll(&self, student_id: i64, course_id: i64) -> AppResult<Enrollment> {
        let (student_id, course_id) = EnrollmentRequest {
            student_id: Some(student_id),
            course_id: Some(course_id),
        }
        .validate()?;

        let enrollment = self.db.transaction(|tx| {
            let student = students::find(tx, student_id)?
                .ok_or(AppError::NotFound(Resource::Student))?;
            let course = courses::find(tx, course_id)?
                .ok_or(AppError::NotFound(Resource::Course))?;

            let existing = tx.query_opt(
                "SELECT id FROM matriculas WHERE aluno_id = ? AND curso_id = ?",
                (student_id, course_id),
                |row| row.get::<_, i64>(0),
            )?;
            if existing.is_some() {
                return Err(AppError::Conflict(Conflict::AlreadyEnrolled));
            }

            let id = tx
                .insert(
                    "INSERT INTO matriculas (aluno_id, curso_id) VALUES (?, ?)",
                    (student_id, course_id),
                )
                .map_err(|e| AppError::from_write(e, Conflict::AlreadyEnrolled))?;

            Ok(Enrollment {
                id,
                student_id,
                student_name: student.name,
                course_id,
                course_title: course.title,
            })
        })?;

        tracing::info!(
            enrollment_id = enrollment.id,
            student_id,
            course_id,
            "student enrolled"
        );
        Ok(enrollment)
    }

    /// Courses a student is enrolled in, ordered by title. A student with
    /// no enrollments yields an empty list.
    pub fn courses_for_student(&self, student_id: i64) -> AppResult<StudentCourses> {
        self.db.read(|tx| {
            let student = students::find(tx, student_id)?
                .ok_or(AppError::NotFound(Resource::Student))?;

            let courses = tx.query(
                "SELECT c.id, c.titulo, c.descricao, m.id
                 FROM cursos c
                 INNER JOIN matriculas m ON c.id = m.curso_id
                 WHERE m.aluno_id = ?
                 ORDER BY c.titulo, c.id",
                [student_id],
                |row| {
                    Ok(EnrolledCourse {
                        course: Course {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            description: row.get(2)?,
                        },
                        enrollment_id: row.get(3)?,
                    })
                },
            )?;

            Ok(StudentCourses {
                student: StudentSummary::from(student),
                total: courses.len(),
                courses,
            })
        })
    }

    /// Students enrolled in a course, ordered by name.
    pub fn students_for_course(&self, course_id: i64) -> AppResult<CourseStudents> {
        self.db.read(|tx| {
            let course = courses::find(tx, course_id)?
                .ok_or(AppError::NotFound(Resource::Course))?;

            let students = tx.query(
                "SELECT a.id, a.nome, a.email, m.id
                 FROM alunos a
                 INNER JOIN matriculas m ON a.id = m.aluno_id
                 WHERE m.curso_id = ?
                 ORDER BY a.nome, a.id",
                [course_id],
                |row| {
                    Ok(EnrolledStudent {
                        student: Student {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                        },
                        enrollment_id: row.get(3)?,
                    })
                },
            )?;

            Ok(CourseStudents {
                course: CourseSummary::from(course),
                total: students.len(),
                students,
            })
        })
    }

    /// Every enrollment, ordered by student name and then course title.
    pub fn list_all(&self) -> AppResult<Vec<EnrollmentListing>> {
        let listing = self.db.read(|tx| {
            tx.query(
                "SELECT m.id, a.id, a.nome, c.id, c.titulo
                 FROM matriculas m
                 INNER JOIN alunos a ON m.aluno_id = a.id
                 INNER JOIN cursos c ON m.curso_id = c.id
                 ORDER BY a.nome, c.titulo, m.id",
                [],
                |row| {
                    Ok(EnrollmentListing {
                        enrollment_id: row.get(0)?,
                        student: StudentSummary {
                            id: row.get(1)?,
                            name: row.get(2)?,
                        },
                        course: CourseSummary {
                            id: row.get(3)?,
                            title: row.get(4)?,
                        },
                    })
                },
            )
        })?;
        Ok(listing)
    }
}
