//! Course domain model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::CourseId;

/// Course a class belongs to (e.g. "Informatics Management").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Short code such as `INF`
    pub code: Option<String>,
}
