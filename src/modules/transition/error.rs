use scholaris_models::ids::CourseId;

use crate::store::StoreError;

/// Failure of one step of the transition for a single student or class.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unsupported grade level {0}")]
    UnsupportedGradeLevel(i16),
    #[error("no section left after 'Z' for course {course_id} grade {grade_level}")]
    SectionsExhausted { course_id: CourseId, grade_level: i16 },
    #[error("invalid section '{0}'")]
    InvalidSection(String),
}
