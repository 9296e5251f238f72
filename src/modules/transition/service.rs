//! Academic-year transition orchestration.
//!
//! Every class of the source year is walked sequentially and each of its
//! active students is evaluated and moved into a class of the next year. A
//! student's work is a single `Result`; failures are folded into the run
//! summary and never stop the batch or undo earlier students.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{Instrument, debug, error, info, instrument, warn};

use scholaris_config::TransitionConfig;
use scholaris_models::ids::{ClassId, CourseId, StudentId};
use scholaris_models::{
    Class, ClassFilter, GradeLevel, PreviewRow, Student, StudentStatus, StudentUpdate,
    TransitionResult,
};

use super::approval::ApprovalEvaluator;
use super::error::TransitionError;
use super::placement::{ClassCache, PlacementEngine};
use crate::metrics::{track_transition_duration, track_transition_run};
use crate::store::SchoolStore;
use crate::utils::tracing::{record_error, record_success};

/// What happened to one student during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentOutcome {
    /// Moved from 10 to 11 or from 11 to 12
    Promoted(ClassId),
    /// Kept at the same level in a class of the next year
    Retained(ClassId),
    /// Moved from 12 into the final internship year
    EnteredFinalYear(ClassId),
    /// Finished level 13 and marked graduated
    Graduated,
}

impl StudentOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            StudentOutcome::Promoted(_) => "promoted",
            StudentOutcome::Retained(_) => "retained",
            StudentOutcome::EnteredFinalYear(_) | StudentOutcome::Graduated => "graduated",
        }
    }

    /// Class the student was placed in; `None` when they graduated in place.
    pub fn destination(&self) -> Option<ClassId> {
        match *self {
            StudentOutcome::Promoted(id)
            | StudentOutcome::Retained(id)
            | StudentOutcome::EnteredFinalYear(id) => Some(id),
            StudentOutcome::Graduated => None,
        }
    }
}

fn tally(
    result: &mut TransitionResult,
    student: &Student,
    outcome: Result<StudentOutcome, TransitionError>,
) {
    match outcome {
        Ok(outcome) => {
            debug!(
                student.id = %student.id,
                outcome = outcome.label(),
                destination = ?outcome.destination(),
                "Student transitioned"
            );
            match outcome {
                StudentOutcome::Promoted(_) => result.promoted += 1,
                StudentOutcome::Retained(_) => result.retained += 1,
                StudentOutcome::EnteredFinalYear(_) | StudentOutcome::Graduated => {
                    result.graduated += 1
                }
            }
        }
        Err(e) => {
            let message = format!("Error processing student {}: {}", student.full_name, e);
            warn!(student.id = %student.id, error = %e, "{}", message);
            result.errors.push(message);
        }
    }
}

pub struct TransitionService<'a, S> {
    store: &'a S,
    config: TransitionConfig,
}

impl<'a, S: SchoolStore> TransitionService<'a, S> {
    pub fn new(store: &'a S, config: TransitionConfig) -> Self {
        Self { store, config }
    }

    fn evaluator(&self) -> ApprovalEvaluator<'a, S> {
        ApprovalEvaluator::new(self.store, self.config.passing_grade)
    }

    fn placement(&self) -> PlacementEngine<'a, S> {
        PlacementEngine::new(self.store, self.config)
    }

    /// Closes `academic_year`, moving every active student into
    /// `academic_year + 1`. Never fails; problems are listed in
    /// [`TransitionResult::errors`].
    pub async fn execute_transition(&self, academic_year: i32) -> TransitionResult {
        let span = crate::business_span!(
            "transition.execute",
            academic_year = academic_year,
            promoted = tracing::field::Empty,
            retained = tracing::field::Empty,
            graduated = tracing::field::Empty
        );

        async move {
            let started = Instant::now();
            let result = self.run(academic_year).await;
            let elapsed = started.elapsed();

            let span = tracing::Span::current();
            span.record("promoted", result.promoted);
            span.record("retained", result.retained);
            span.record("graduated", result.graduated);
            if result.has_errors() {
                record_error(&format!("{} error(s) during transition", result.errors.len()));
            } else {
                record_success();
            }

            info!(
                source_academic_year = result.source_academic_year,
                target_academic_year = result.target_academic_year,
                promoted = result.promoted,
                retained = result.retained,
                graduated = result.graduated,
                classes_created = result.classes_created,
                errors = result.errors.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Academic year transition finished"
            );
            track_transition_run(&result);
            track_transition_duration(elapsed);

            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, academic_year: i32) -> TransitionResult {
        let source_classes = match self
            .store
            .list_classes(ClassFilter::for_year(academic_year))
            .await
        {
            Ok(classes) if classes.is_empty() => {
                warn!(academic_year, "No classes to transition");
                return TransitionResult::aborted(
                    academic_year,
                    format!("No classes found for academic year {}", academic_year),
                );
            }
            Ok(classes) => classes,
            Err(e) => {
                error!(error = %e, academic_year, "Failed to list source classes");
                return TransitionResult::aborted(academic_year, format!("Transition failed: {}", e));
            }
        };

        let mut result = TransitionResult::new(academic_year);

        let mut cache = match self
            .store
            .list_classes(ClassFilter::for_year(result.target_academic_year))
            .await
        {
            Ok(classes) => ClassCache::new(classes),
            Err(e) => {
                error!(error = %e, academic_year, "Failed to list destination classes");
                return TransitionResult::aborted(academic_year, format!("Transition failed: {}", e));
            }
        };

        info!(
            academic_year,
            classes = source_classes.len(),
            known_destination_classes = cache.len(),
            "Starting academic year transition"
        );

        for class in &source_classes {
            let students = match self.store.list_active_students(class.id).await {
                Ok(students) => students,
                Err(e) => {
                    let message =
                        format!("Failed to load students for class {}: {}", class.name(), e);
                    warn!(class.id = %class.id, error = %e, "{}", message);
                    result.errors.push(message);
                    continue;
                }
            };

            for student in &students {
                let outcome = self.transition_student(&mut cache, class, student).await;
                tally(&mut result, student, outcome);
            }
        }

        result.classes_created = cache.created_count();
        result
    }

    #[instrument(skip(self, cache, class, student), fields(student.id = %student.id, class.id = %class.id))]
    async fn transition_student(
        &self,
        cache: &mut ClassCache,
        class: &Class,
        student: &Student,
    ) -> Result<StudentOutcome, TransitionError> {
        let grade_level = GradeLevel::try_from(class.grade_level)
            .map_err(TransitionError::UnsupportedGradeLevel)?;
        let target_year = class.academic_year + 1;

        let approved = self
            .evaluator()
            .is_approved(student.id, class.id, class.academic_year)
            .await?;

        if !approved {
            let destination = self
                .placement()
                .resolve_destination_class(cache, class.course_id, grade_level, target_year)
                .await?;
            self.store
                .update_student(student.id, StudentUpdate::move_to(destination))
                .await?;
            return Ok(StudentOutcome::Retained(destination));
        }

        match grade_level.next() {
            Some(next_level) => {
                let destination = self
                    .placement()
                    .resolve_destination_class(cache, class.course_id, next_level, target_year)
                    .await?;

                // The move must be the last write; a re-run only sees students
                // still in the source year.
                let entering_final_year = next_level == GradeLevel::Thirteenth;
                if entering_final_year {
                    self.ensure_final_year_records(student.id).await?;
                }

                self.store
                    .update_student(student.id, StudentUpdate::move_to(destination))
                    .await?;

                Ok(if entering_final_year {
                    StudentOutcome::EnteredFinalYear(destination)
                } else {
                    StudentOutcome::Promoted(destination)
                })
            }
            None => {
                self.store
                    .update_student(student.id, StudentUpdate::set_status(StudentStatus::Graduated))
                    .await?;
                Ok(StudentOutcome::Graduated)
            }
        }
    }

    /// Creates the internship and final-work records of a student entering
    /// level 13, skipping any that already exist.
    #[instrument(skip(self))]
    pub async fn ensure_final_year_records(
        &self,
        student_id: StudentId,
    ) -> Result<(), TransitionError> {
        if self.store.find_internship(student_id).await?.is_none() {
            self.store.create_internship(student_id).await?;
        }
        if self.store.find_final_work(student_id).await?.is_none() {
            self.store.create_final_work(student_id).await?;
        }
        Ok(())
    }

    /// Expected approvals per class of `academic_year`, without writing
    /// anything. Returns an empty list if the classes cannot be read.
    pub async fn transition_preview(&self, academic_year: i32) -> Vec<PreviewRow> {
        let span = crate::business_span!("transition.preview", academic_year = academic_year);

        async move {
            match self.build_preview(academic_year).await {
                Ok(rows) => {
                    record_success();
                    rows
                }
                Err(e) => {
                    record_error(&e.to_string());
                    error!(error = %e, academic_year, "Failed to build transition preview");
                    Vec::new()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn build_preview(&self, academic_year: i32) -> Result<Vec<PreviewRow>, TransitionError> {
        let classes = self
            .store
            .list_classes(ClassFilter::for_year(academic_year))
            .await?;
        let course_names: HashMap<CourseId, String> = self
            .store
            .list_courses()
            .await?
            .into_iter()
            .map(|course| (course.id, course.name))
            .collect();

        let evaluator = self.evaluator();
        let mut rows = Vec::with_capacity(classes.len());

        for class in &classes {
            let students = match self.store.list_active_students(class.id).await {
                Ok(students) => students,
                Err(e) => {
                    warn!(class.id = %class.id, error = %e, "Skipping class in preview");
                    continue;
                }
            };

            let mut approved = 0u32;
            for student in &students {
                match evaluator
                    .is_approved(student.id, class.id, class.academic_year)
                    .await
                {
                    Ok(true) => approved += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(student.id = %student.id, error = %e, "Counting student as failed");
                    }
                }
            }

            let total_students = students.len() as u32;
            rows.push(PreviewRow {
                class_id: class.id,
                class_name: class.name(),
                course_name: course_names
                    .get(&class.course_id)
                    .cloned()
                    .unwrap_or_default(),
                total_students,
                approved,
                failed: total_students - approved,
                grade_level: class.grade_level,
            });
        }

        rows.sort_by(|a, b| {
            a.grade_level
                .cmp(&b.grade_level)
                .then_with(|| a.class_name.cmp(&b.class_name))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SchoolStore};

    fn service(store: &MemoryStore) -> TransitionService<'_, MemoryStore> {
        TransitionService::new(store, TransitionConfig::default())
    }

    #[tokio::test]
    async fn test_pass_and_fail_in_one_class() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 11, "A", 2025);
        let passing = store.add_student("Ana Silva", class);
        let failing = store.add_student("Rui Costa", class);
        store.add_grades(passing, class, 2025, &[Some(11.0)]);
        store.add_grades(failing, class, 2025, &[Some(6.0)]);

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.promoted, 1);
        assert_eq!(result.retained, 1);
        assert_eq!(result.graduated, 0);
        assert!(result.errors.is_empty());
        assert_eq!(result.target_academic_year, 2026);

        let promoted_class = store
            .class(store.student(passing).unwrap().class_id.unwrap())
            .unwrap();
        assert_eq!(promoted_class.grade_level, 12);
        assert_eq!(promoted_class.academic_year, 2026);

        let retained_class = store
            .class(store.student(failing).unwrap().class_id.unwrap())
            .unwrap();
        assert_eq!(retained_class.grade_level, 11);
        assert_eq!(retained_class.academic_year, 2026);
        assert_eq!(result.classes_created, 2);
    }

    #[tokio::test]
    async fn test_update_failure_is_isolated() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 10, "A", 2025);
        let broken = store.add_student("Ana Silva", class);
        let fine = store.add_student("Rui Costa", class);
        store.add_grades(broken, class, 2025, &[Some(15.0)]);
        store.add_grades(fine, class, 2025, &[Some(15.0)]);
        store.fail_update_for(broken);

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Ana Silva"));
        assert_eq!(result.promoted, 1);
        assert_eq!(store.student(broken).unwrap().class_id, Some(class));
        assert_ne!(store.student(fine).unwrap().class_id, Some(class));
    }

    #[tokio::test]
    async fn test_level_twelve_pass_creates_final_year_records_once() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 12, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, &[Some(14.0)]);

        let result = service(&store).execute_transition(2025).await;
        assert_eq!(result.graduated, 1);
        assert!(result.errors.is_empty());

        let final_class = store
            .class(store.student(student).unwrap().class_id.unwrap())
            .unwrap();
        assert_eq!(final_class.grade_level, 13);
        assert_eq!(final_class.academic_year, 2026);

        assert_eq!(store.internship_count(student), 1);
        assert_eq!(store.final_work_count(student), 1);
    }

    #[tokio::test]
    async fn test_failed_record_creation_keeps_student_in_place() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 12, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, &[Some(14.0)]);
        store.fail_record_creation_for(student);

        let first = service(&store).execute_transition(2025).await;

        assert_eq!(first.errors.len(), 1);
        assert!(first.errors[0].contains("Ana Silva"));
        assert_eq!(first.graduated, 0);
        assert_eq!(store.student(student).unwrap().class_id, Some(class));
        assert_eq!(store.internship_count(student), 0);

        store.clear_faults();
        let second = service(&store).execute_transition(2025).await;

        assert!(second.errors.is_empty());
        assert_eq!(second.graduated, 1);
        let final_class = store
            .class(store.student(student).unwrap().class_id.unwrap())
            .unwrap();
        assert_eq!(final_class.grade_level, 13);
        assert_eq!(store.internship_count(student), 1);
        assert_eq!(store.final_work_count(student), 1);
    }

    #[tokio::test]
    async fn test_existing_final_year_records_are_reused() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 12, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, &[Some(14.0)]);
        store.create_internship(student).await.unwrap();
        store.create_final_work(student).await.unwrap();

        let result = service(&store).execute_transition(2025).await;

        assert!(result.errors.is_empty());
        assert_eq!(result.graduated, 1);
        assert_eq!(store.internship_count(student), 1);
        assert_eq!(store.final_work_count(student), 1);
    }

    #[tokio::test]
    async fn test_update_failure_after_records_can_be_retried() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 12, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, &[Some(14.0)]);
        store.fail_update_for(student);

        let first = service(&store).execute_transition(2025).await;
        assert_eq!(first.errors.len(), 1);
        assert_eq!(store.student(student).unwrap().class_id, Some(class));

        store.clear_faults();
        let second = service(&store).execute_transition(2025).await;

        assert!(second.errors.is_empty());
        assert_eq!(second.graduated, 1);
        assert_eq!(store.internship_count(student), 1);
        assert_eq!(store.final_work_count(student), 1);
    }

    #[test]
    fn test_outcome_destination() {
        let id = ClassId::new();
        assert_eq!(StudentOutcome::Promoted(id).destination(), Some(id));
        assert_eq!(StudentOutcome::EnteredFinalYear(id).destination(), Some(id));
        assert_eq!(StudentOutcome::Graduated.destination(), None);
    }

    #[tokio::test]
    async fn test_level_thirteen_pass_graduates_in_place() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 13, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, &[Some(16.0), Some(12.0)]);

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.graduated, 1);
        assert_eq!(result.classes_created, 0);
        let student = store.student(student).unwrap();
        assert_eq!(student.status, StudentStatus::Graduated);
        assert_eq!(student.class_id, Some(class));
    }

    #[tokio::test]
    async fn test_level_thirteen_fail_is_retained() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 13, "A", 2025);
        let student = store.add_student("Ana Silva", class);

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.retained, 1);
        let student = store.student(student).unwrap();
        assert_eq!(student.status, StudentStatus::Active);
        assert_eq!(store.class(student.class_id.unwrap()).unwrap().grade_level, 13);
    }

    #[tokio::test]
    async fn test_no_classes_aborts() {
        let store = MemoryStore::new();

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.errors, vec!["No classes found for academic year 2025"]);
        assert_eq!(result.processed(), 0);
    }

    #[tokio::test]
    async fn test_class_listing_failure_aborts() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        store.add_class(course, 10, "A", 2025);
        store.fail_class_listing();

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Transition failed:"));
        assert_eq!(result.processed(), 0);
    }

    #[tokio::test]
    async fn test_student_listing_failure_skips_class() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let broken = store.add_class(course, 10, "A", 2025);
        let fine = store.add_class(course, 10, "B", 2025);
        store.add_student("Ana Silva", broken);
        let student = store.add_student("Rui Costa", fine);
        store.add_grades(student, fine, 2025, &[Some(12.0)]);
        store.fail_student_listing_for(broken);

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("10A"));
        assert_eq!(result.promoted, 1);
    }

    #[tokio::test]
    async fn test_unsupported_grade_level_is_reported_per_student() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 9, "A", 2025);
        store.add_student("Ana Silva", class);
        store.add_student("Rui Costa", class);

        let result = service(&store).execute_transition(2025).await;

        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("unsupported grade level 9"));
    }

    #[tokio::test]
    async fn test_preview_counts_without_mutating() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let b = store.add_class(course, 11, "B", 2025);
        let a = store.add_class(course, 10, "A", 2025);
        let passing = store.add_student("Ana Silva", a);
        let failing = store.add_student("Rui Costa", a);
        store.add_student("Marta Sousa", b);
        store.add_grades(passing, a, 2025, &[Some(10.0)]);
        store.add_grades(failing, a, 2025, &[Some(9.9)]);

        let rows = service(&store).transition_preview(2025).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class_name, "10A");
        assert_eq!(rows[0].course_name, "Informatics");
        assert_eq!(rows[0].total_students, 2);
        assert_eq!(rows[0].approved, 1);
        assert_eq!(rows[0].failed, 1);
        assert_eq!(rows[1].class_name, "11B");
        assert_eq!(rows[1].failed, 1);
        assert_eq!(store.student(passing).unwrap().class_id, Some(a));
    }

    #[tokio::test]
    async fn test_preview_counts_unreadable_grades_as_failed() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let class = store.add_class(course, 10, "A", 2025);
        let student = store.add_student("Ana Silva", class);
        store.add_grades(student, class, 2025, &[Some(18.0)]);
        store.fail_grade_reads_for(student);

        let rows = service(&store).transition_preview(2025).await;

        assert_eq!(rows[0].approved, 0);
        assert_eq!(rows[0].failed, 1);
    }

    #[tokio::test]
    async fn test_preview_skips_class_with_unreadable_students() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        let broken = store.add_class(course, 10, "A", 2025);
        let fine = store.add_class(course, 10, "B", 2025);
        store.add_student("Ana Silva", broken);
        let student = store.add_student("Rui Costa", fine);
        store.add_grades(student, fine, 2025, &[Some(12.0)]);
        store.fail_student_listing_for(broken);

        let rows = service(&store).transition_preview(2025).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].class_id, fine);
        assert_eq!(rows[0].approved, 1);
    }

    #[tokio::test]
    async fn test_preview_is_empty_when_classes_cannot_be_read() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        store.add_class(course, 10, "A", 2025);
        store.fail_class_listing();

        assert!(service(&store).transition_preview(2025).await.is_empty());
    }
}
