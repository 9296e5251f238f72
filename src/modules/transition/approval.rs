//! Pass/fail decision for one student in one class and year.
//!
//! The mark is the flat mean of every recorded final trimester mark (`mt`)
//! across all subjects. Missing marks are ignored; a student with no marks at
//! all is not approved.

use tracing::instrument;

use scholaris_models::Grade;
use scholaris_models::ids::{ClassId, StudentId};

use crate::store::{SchoolStore, StoreError};

/// Mean of the non-null `mt` values, or `None` when there are none.
pub fn average_final_marks(grades: &[Grade]) -> Option<f64> {
    let marks: Vec<f64> = grades.iter().filter_map(|g| g.mt).collect();
    if marks.is_empty() {
        return None;
    }
    Some(marks.iter().sum::<f64>() / marks.len() as f64)
}

pub fn is_passing(average: Option<f64>, passing_grade: f64) -> bool {
    average.is_some_and(|avg| avg >= passing_grade)
}

pub struct ApprovalEvaluator<'a, S> {
    store: &'a S,
    passing_grade: f64,
}

impl<'a, S: SchoolStore> ApprovalEvaluator<'a, S> {
    pub fn new(store: &'a S, passing_grade: f64) -> Self {
        Self {
            store,
            passing_grade,
        }
    }

    #[instrument(skip(self))]
    pub async fn is_approved(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        academic_year: i32,
    ) -> Result<bool, StoreError> {
        let grades = self
            .store
            .list_grades(student_id, class_id, academic_year)
            .await?;
        let average = average_final_marks(&grades);

        tracing::debug!(
            student.id = %student_id,
            grades = grades.len(),
            average = ?average,
            "Evaluated final marks"
        );

        Ok(is_passing(average, self.passing_grade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use scholaris_config::transition::DEFAULT_PASSING_GRADE;

    async fn approved_with(marks: &[Option<f64>]) -> bool {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 11, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, marks);

        ApprovalEvaluator::new(&store, DEFAULT_PASSING_GRADE)
            .is_approved(student, class, 2025)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_mean_of_exactly_passing_grade_is_approved() {
        assert!(approved_with(&[Some(12.0), Some(8.0)]).await);
        assert!(approved_with(&[Some(10.0)]).await);
    }

    #[tokio::test]
    async fn test_below_passing_grade_fails() {
        assert!(!approved_with(&[Some(9.0), Some(10.5)]).await);
    }

    #[tokio::test]
    async fn test_no_grades_fails() {
        assert!(!approved_with(&[]).await);
    }

    #[tokio::test]
    async fn test_all_null_marks_fail() {
        assert!(!approved_with(&[None, None, None]).await);
    }

    #[tokio::test]
    async fn test_partial_marks_use_only_recorded_values() {
        assert!(approved_with(&[Some(14.0), None, Some(6.0)]).await);
        assert!(!approved_with(&[Some(4.0), None]).await);
    }

    #[tokio::test]
    async fn test_grades_of_other_years_are_ignored() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 11, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2024, &[Some(18.0)]);

        let approved = ApprovalEvaluator::new(&store, DEFAULT_PASSING_GRADE)
            .is_approved(student, class, 2025)
            .await
            .unwrap();
        assert!(!approved);
    }

    #[test]
    fn test_average_final_marks() {
        assert_eq!(average_final_marks(&[]), None);
        assert!(!is_passing(None, 0.0));
        assert!(is_passing(Some(9.5), 9.5));
    }
}
