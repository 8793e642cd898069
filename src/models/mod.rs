//! Domain models for the enrollment service.
//!
//! # Entities
//!
//! - [`Student`]: registered person, identified by a unique email.
//! - [`Course`]: something students can enroll in.
//! - [`Enrollment`]: join entity tying one student to one course. A pair
//!   (student, course) exists at most once, and an enrollment never
//!   outlives either side.
//!
//! Wire names are Portuguese (`nome`, `titulo`, `matricula_id`, ...) and
//! mapped with serde renames; the Rust side uses English names.
//!
//! Write inputs come in two layers. The `*Request` types mirror request
//! bodies with every field optional, so that a missing field and a wrongly
//! typed one are told apart. Their `validate` methods produce the typed
//! inputs ([`NewStudent`], [`StudentUpdate`], ...) that repositories accept
//! and that cannot be built with an empty required field.

mod course;
mod enrollment;
mod student;

pub use course::*;
pub use enrollment::*;
pub use student::*;

/// Outcome of deleting a student or course together with its enrollments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDeletion {
    /// Name of the student or title of the course that was removed.
    pub label: String,
    pub removed_enrollments: usize,
}

/// Absent, `null` and empty strings all count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Absent, `null` and `0` all count as missing.
fn present_id(value: Option<i64>) -> Option<i64> {
    value.filter(|&id| id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_missing() {
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some("Ana".into())), Some("Ana".into()));
    }

    #[test]
    fn zero_id_is_missing() {
        assert_eq!(present_id(Some(0)), None);
        assert_eq!(present_id(Some(7)), Some(7));
        assert_eq!(present_id(None), None);
    }
}
