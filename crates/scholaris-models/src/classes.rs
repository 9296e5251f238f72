//! Class domain models and DTOs.
//!
//! A class is one section ("A", "B", ...) of a grade level within a course and
//! academic year. The tuple `(course_id, grade_level, section, period,
//! academic_year)` is unique.

use std::fmt;
use std::str::FromStr;

use scholaris_core::pagination::optional_from_str;
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{ClassId, CourseId, TeacherId};

/// Grade levels a class can belong to. Level 13 is the terminal
/// internship/final-work year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GradeLevel {
    Tenth,
    Eleventh,
    Twelfth,
    Thirteenth,
}

impl GradeLevel {
    pub const fn as_i16(self) -> i16 {
        match self {
            GradeLevel::Tenth => 10,
            GradeLevel::Eleventh => 11,
            GradeLevel::Twelfth => 12,
            GradeLevel::Thirteenth => 13,
        }
    }

    /// The level a promoted student moves to. `None` for the terminal level.
    pub const fn next(self) -> Option<GradeLevel> {
        match self {
            GradeLevel::Tenth => Some(GradeLevel::Eleventh),
            GradeLevel::Eleventh => Some(GradeLevel::Twelfth),
            GradeLevel::Twelfth => Some(GradeLevel::Thirteenth),
            GradeLevel::Thirteenth => None,
        }
    }
}

impl TryFrom<i16> for GradeLevel {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(GradeLevel::Tenth),
            11 => Ok(GradeLevel::Eleventh),
            12 => Ok(GradeLevel::Twelfth),
            13 => Ok(GradeLevel::Thirteenth),
            other => Err(other),
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i16())
    }
}

/// Shift a class runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "class_period", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClassPeriod {
    Morning,
    Afternoon,
}

impl fmt::Display for ClassPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassPeriod::Morning => write!(f, "morning"),
            ClassPeriod::Afternoon => write!(f, "afternoon"),
        }
    }
}

impl FromStr for ClassPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(ClassPeriod::Morning),
            "afternoon" => Ok(ClassPeriod::Afternoon),
            other => Err(format!("unknown class period '{}'", other)),
        }
    }
}

/// Class entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub course_id: CourseId,
    /// Grade level (10-13)
    pub grade_level: i16,
    /// Single uppercase letter, ordered lexicographically
    pub section: String,
    /// Academic year label (e.g. 2025 for Sept 2025 - Jul 2026)
    pub academic_year: i32,
    pub period: ClassPeriod,
    /// Capacity; `None` means the configured default applies
    pub max_students: Option<i32>,
    pub class_director_id: Option<TeacherId>,
}

impl Class {
    /// Display name such as `11A`.
    pub fn name(&self) -> String {
        format!("{}{}", self.grade_level, self.section)
    }

    /// Effective capacity, falling back to `default_max` when unset.
    pub fn capacity(&self, default_max: i32) -> i64 {
        i64::from(self.max_students.unwrap_or(default_max))
    }
}

/// Values for a class about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub course_id: CourseId,
    pub grade_level: i16,
    pub section: String,
    pub academic_year: i32,
    pub period: ClassPeriod,
    pub max_students: Option<i32>,
    pub class_director_id: Option<TeacherId>,
}

impl NewClass {
    pub fn into_class(self, id: ClassId) -> Class {
        Class {
            id,
            course_id: self.course_id,
            grade_level: self.grade_level,
            section: self.section,
            academic_year: self.academic_year,
            period: self.period,
            max_students: self.max_students,
            class_director_id: self.class_director_id,
        }
    }
}

/// Filter used when listing classes from the store. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassFilter {
    pub academic_year: Option<i32>,
    pub course_id: Option<CourseId>,
    pub grade_level: Option<i16>,
}

impl ClassFilter {
    pub fn for_year(academic_year: i32) -> Self {
        Self {
            academic_year: Some(academic_year),
            ..Self::default()
        }
    }

    pub fn matches(&self, class: &Class) -> bool {
        self.academic_year.is_none_or(|y| class.academic_year == y)
            && self.course_id.is_none_or(|c| class.course_id == c)
            && self.grade_level.is_none_or(|g| class.grade_level == g)
    }
}

/// Class with its current number of active students.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub class: Class,
    /// Number of active students assigned to the class
    pub student_count: i64,
}

/// Query parameters for listing classes.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    /// Filter by academic year
    #[serde(default, deserialize_with = "optional_from_str")]
    #[validate(range(min = 2000, max = 2100))]
    pub academic_year: Option<i32>,
    /// Filter by course
    #[serde(default, deserialize_with = "optional_from_str")]
    pub course_id: Option<CourseId>,
    /// Filter by grade level (10-13)
    #[serde(default, deserialize_with = "optional_from_str")]
    #[validate(range(min = 10, max = 13))]
    pub grade_level: Option<i16>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ClassFilterParams {
    pub fn filter(&self) -> ClassFilter {
        ClassFilter {
            academic_year: self.academic_year,
            course_id: self.course_id,
            grade_level: self.grade_level,
        }
    }
}

/// Paginated response containing classes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub data: Vec<ClassWithStats>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_class(grade_level: i16, section: &str, academic_year: i32) -> Class {
        Class {
            id: ClassId::new(),
            course_id: CourseId::new(),
            grade_level,
            section: section.to_string(),
            academic_year,
            period: ClassPeriod::Morning,
            max_students: None,
            class_director_id: None,
        }
    }

    #[test]
    fn test_grade_level_conversion() {
        assert_eq!(GradeLevel::try_from(10), Ok(GradeLevel::Tenth));
        assert_eq!(GradeLevel::try_from(13), Ok(GradeLevel::Thirteenth));
        assert_eq!(GradeLevel::try_from(9), Err(9));
        assert_eq!(GradeLevel::try_from(14), Err(14));
    }

    #[test]
    fn test_grade_level_next() {
        assert_eq!(GradeLevel::Tenth.next(), Some(GradeLevel::Eleventh));
        assert_eq!(GradeLevel::Twelfth.next(), Some(GradeLevel::Thirteenth));
        assert_eq!(GradeLevel::Thirteenth.next(), None);
    }

    #[test]
    fn test_class_period_parse() {
        assert_eq!("morning".parse::<ClassPeriod>(), Ok(ClassPeriod::Morning));
        assert_eq!(" Afternoon ".parse::<ClassPeriod>(), Ok(ClassPeriod::Afternoon));
        assert!("evening".parse::<ClassPeriod>().is_err());
    }

    #[test]
    fn test_class_name_and_capacity() {
        let mut class = sample_class(11, "B", 2025);
        assert_eq!(class.name(), "11B");
        assert_eq!(class.capacity(40), 40);

        class.max_students = Some(25);
        assert_eq!(class.capacity(40), 25);
    }

    #[test]
    fn test_class_filter_matches() {
        let class = sample_class(12, "A", 2026);

        assert!(ClassFilter::default().matches(&class));
        assert!(ClassFilter::for_year(2026).matches(&class));
        assert!(!ClassFilter::for_year(2025).matches(&class));

        let filter = ClassFilter {
            academic_year: Some(2026),
            course_id: Some(class.course_id),
            grade_level: Some(11),
        };
        assert!(!filter.matches(&class));
    }

    #[test]
    fn test_class_filter_params_validation() {
        let params = ClassFilterParams {
            academic_year: Some(2025),
            course_id: None,
            grade_level: Some(12),
            pagination: PaginationParams::default(),
        };
        assert!(params.validate().is_ok());

        let params = ClassFilterParams {
            academic_year: Some(2025),
            course_id: None,
            grade_level: Some(9),
            pagination: PaginationParams::default(),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_class_period_json() {
        let json = serde_json::to_string(&ClassPeriod::Afternoon).unwrap();
        assert_eq!(json, r#""afternoon""#);
    }
}
