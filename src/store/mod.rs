//! Persistence seam used by the transition and class modules.
//!
//! [`SchoolStore`] is the narrow set of record reads and writes the
//! academic-year transition needs. [`PgStore`] talks to PostgreSQL;
//! [`MemoryStore`] keeps everything in process and is used by tests.
//!
//! Every method returns a `Send` future so handlers can drive a run from an
//! axum task.

use std::future::Future;

use scholaris_models::ids::{ClassId, FinalWorkId, InternshipId, StudentId};
use scholaris_models::{
    Class, ClassFilter, ClassWithStats, Course, Grade, NewClass, Student, StudentUpdate,
};

pub mod pg;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait SchoolStore: Send + Sync {
    fn list_classes(
        &self,
        filter: ClassFilter,
    ) -> impl Future<Output = Result<Vec<Class>, StoreError>> + Send;

    /// One page of classes with their active-student counts, plus the total
    /// number of classes matching `filter`.
    fn list_classes_with_stats(
        &self,
        filter: ClassFilter,
        limit: i64,
        offset: i64,
    ) -> impl Future<Output = Result<(Vec<ClassWithStats>, i64), StoreError>> + Send;

    fn list_courses(&self) -> impl Future<Output = Result<Vec<Course>, StoreError>> + Send;

    fn list_active_students(
        &self,
        class_id: ClassId,
    ) -> impl Future<Output = Result<Vec<Student>, StoreError>> + Send;

    fn list_grades(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        academic_year: i32,
    ) -> impl Future<Output = Result<Vec<Grade>, StoreError>> + Send;

    /// Fails with [`StoreError::Conflict`] when the class identity tuple is taken.
    fn create_class(
        &self,
        new_class: NewClass,
    ) -> impl Future<Output = Result<ClassId, StoreError>> + Send;

    fn update_student(
        &self,
        student_id: StudentId,
        update: StudentUpdate,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn find_internship(
        &self,
        student_id: StudentId,
    ) -> impl Future<Output = Result<Option<InternshipId>, StoreError>> + Send;

    fn create_internship(
        &self,
        student_id: StudentId,
    ) -> impl Future<Output = Result<InternshipId, StoreError>> + Send;

    fn find_final_work(
        &self,
        student_id: StudentId,
    ) -> impl Future<Output = Result<Option<FinalWorkId>, StoreError>> + Send;

    fn create_final_work(
        &self,
        student_id: StudentId,
    ) -> impl Future<Output = Result<FinalWorkId, StoreError>> + Send;

    fn count_active_students_in_class(
        &self,
        class_id: ClassId,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;
}
