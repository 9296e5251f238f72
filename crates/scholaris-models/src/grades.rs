//! Grade domain model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassId, GradeId, StudentId, SubjectId};

/// One subject's marks for a student in one trimester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    /// Trimester (1-3)
    pub trimester: i16,
    /// Final trimester mark (0-20 scale); `None` until the mark is finalized
    pub mt: Option<f64>,
    pub academic_year: i32,
}
