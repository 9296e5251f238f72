//! Academic-year transition DTOs.
//!
//! [`TransitionResult`] is the summary of a transition run; its `errors`
//! list is the only error channel of the run. A non-empty list together with
//! non-zero counters means the run partially succeeded.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::ClassId;

/// Request body for executing a transition.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TransitionRequest {
    /// Academic year being closed (students move to `academic_year + 1`)
    #[validate(range(min = 2000, max = 2100))]
    pub academic_year: i32,
}

/// Query parameters naming an academic year.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AcademicYearQuery {
    /// Academic year label
    #[validate(range(min = 2000, max = 2100))]
    pub academic_year: i32,
}

/// Summary of a transition run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransitionResult {
    /// Year that was closed
    pub source_academic_year: i32,
    /// Year students were moved into
    pub target_academic_year: i32,
    /// Students moved to the next grade level (10 -> 11, 11 -> 12)
    pub promoted: u32,
    /// Students kept at the same grade level in the new year
    pub retained: u32,
    /// Students moved from 12 to 13 or marked graduated at 13
    pub graduated: u32,
    /// Class sections opened during the run
    pub classes_created: u32,
    /// One message per failure; empty on a clean run
    pub errors: Vec<String>,
}

impl TransitionResult {
    pub fn new(source_academic_year: i32) -> Self {
        Self {
            source_academic_year,
            target_academic_year: source_academic_year + 1,
            ..Self::default()
        }
    }

    /// Result of a run that stopped before touching any student.
    pub fn aborted(source_academic_year: i32, message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::new(source_academic_year)
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn processed(&self) -> u32 {
        self.promoted + self.retained + self.graduated
    }
}

/// Expected outcome for one class, computed without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PreviewRow {
    pub class_id: ClassId,
    /// Grade level and section, e.g. `11A`
    pub class_name: String,
    pub course_name: String,
    /// Active students in the class
    pub total_students: u32,
    pub approved: u32,
    pub failed: u32,
    pub grade_level: i16,
}

/// Response of the current academic year endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrentAcademicYearResponse {
    pub academic_year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_request_validation() {
        assert!(TransitionRequest { academic_year: 2025 }.validate().is_ok());
        assert!(TransitionRequest { academic_year: 1999 }.validate().is_err());
        assert!(TransitionRequest { academic_year: 2101 }.validate().is_err());
    }

    #[test]
    fn test_new_result_targets_next_year() {
        let result = TransitionResult::new(2025);
        assert_eq!(result.target_academic_year, 2026);
        assert_eq!(result.processed(), 0);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_aborted_result_has_single_error_and_zero_counters() {
        let result = TransitionResult::aborted(2025, "No classes found for academic year 2025");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.promoted, 0);
        assert_eq!(result.retained, 0);
        assert_eq!(result.graduated, 0);
        assert_eq!(result.target_academic_year, 2026);
    }
}
