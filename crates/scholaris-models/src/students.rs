//! Student domain models.
//!
//! Only the fields the academic-year transition reads or writes are modelled
//! here; profile data lives with the rest of the student records.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassId, StudentId};

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "student_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Dropout,
    Graduated,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentStatus::Active => write!(f, "active"),
            StudentStatus::Dropout => write!(f, "dropout"),
            StudentStatus::Graduated => write!(f, "graduated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
    /// `None` means the student is not assigned to any class
    pub class_id: Option<ClassId>,
    pub status: StudentStatus,
}

/// Partial update applied to a student. Unset fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub class_id: Option<ClassId>,
    pub status: Option<StudentStatus>,
}

impl StudentUpdate {
    pub fn move_to(class_id: ClassId) -> Self {
        Self {
            class_id: Some(class_id),
            status: None,
        }
    }

    pub fn set_status(status: StudentStatus) -> Self {
        Self {
            class_id: None,
            status: Some(status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class_id.is_none() && self.status.is_none()
    }
}
