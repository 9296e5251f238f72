//! In-process [`SchoolStore`] for tests.
//!
//! State is shared behind an `Arc<Mutex<_>>`, so clones observe each other's
//! writes. Faults can be injected per student or per class to exercise the
//! error paths of the transition.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scholaris_models::ids::{
    ClassId, CourseId, FinalWorkId, GradeId, InternshipId, StudentId, SubjectId,
};
use scholaris_models::{
    Class, ClassFilter, ClassPeriod, ClassWithStats, Course, FinalWork, Grade, Internship,
    NewClass, RecordStatus, Student, StudentStatus, StudentUpdate,
};

use super::{SchoolStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    courses: Vec<Course>,
    classes: Vec<Class>,
    students: Vec<Student>,
    grades: Vec<Grade>,
    internships: Vec<Internship>,
    final_works: Vec<FinalWork>,
    failing_updates: HashSet<StudentId>,
    failing_student_listings: HashSet<ClassId>,
    failing_grade_reads: HashSet<StudentId>,
    failing_record_creations: HashSet<StudentId>,
    fail_class_listing: bool,
    fail_class_creation: bool,
}

impl MemoryState {
    fn active_count(&self, class_id: ClassId) -> i64 {
        self.students
            .iter()
            .filter(|s| s.class_id == Some(class_id) && s.status == StudentStatus::Active)
            .count() as i64
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_course(&self, name: &str) -> CourseId {
        let id = CourseId::new();
        self.state().courses.push(Course {
            id,
            name: name.to_string(),
            code: None,
        });
        id
    }

    /// Adds a morning class with the default capacity.
    pub fn add_class(
        &self,
        course_id: CourseId,
        grade_level: i16,
        section: &str,
        academic_year: i32,
    ) -> ClassId {
        self.insert_class(Class {
            id: ClassId::new(),
            course_id,
            grade_level,
            section: section.to_string(),
            academic_year,
            period: ClassPeriod::Morning,
            max_students: None,
            class_director_id: None,
        })
    }

    pub fn insert_class(&self, class: Class) -> ClassId {
        let id = class.id;
        self.state().classes.push(class);
        id
    }

    pub fn add_student(&self, full_name: &str, class_id: ClassId) -> StudentId {
        self.add_student_with_status(full_name, class_id, StudentStatus::Active)
    }

    pub fn add_student_with_status(
        &self,
        full_name: &str,
        class_id: ClassId,
        status: StudentStatus,
    ) -> StudentId {
        let id = StudentId::new();
        self.state().students.push(Student {
            id,
            full_name: full_name.to_string(),
            class_id: Some(class_id),
            status,
        });
        id
    }

    /// Fills `class_id` with `count` active students.
    pub fn fill_class(&self, class_id: ClassId, count: usize) {
        for n in 0..count {
            self.add_student(&format!("Filler {}", n + 1), class_id);
        }
    }

    /// Records one grade row per mark, each for a different subject.
    pub fn add_grades(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        academic_year: i32,
        marks: &[Option<f64>],
    ) {
        let mut state = self.state();
        for mt in marks {
            state.grades.push(Grade {
                id: GradeId::new(),
                student_id,
                class_id,
                subject_id: SubjectId::new(),
                trimester: 3,
                mt: *mt,
                academic_year,
            });
        }
    }

    pub fn fail_update_for(&self, student_id: StudentId) {
        self.state().failing_updates.insert(student_id);
    }

    pub fn fail_student_listing_for(&self, class_id: ClassId) {
        self.state().failing_student_listings.insert(class_id);
    }

    pub fn fail_grade_reads_for(&self, student_id: StudentId) {
        self.state().failing_grade_reads.insert(student_id);
    }

    /// Internship and final-work creation fail for this student.
    pub fn fail_record_creation_for(&self, student_id: StudentId) {
        self.state().failing_record_creations.insert(student_id);
    }

    /// Drops every injected fault; stored records are kept.
    pub fn clear_faults(&self) {
        let mut state = self.state();
        state.failing_updates.clear();
        state.failing_student_listings.clear();
        state.failing_grade_reads.clear();
        state.failing_record_creations.clear();
        state.fail_class_listing = false;
        state.fail_class_creation = false;
    }

    pub fn fail_class_listing(&self) {
        self.state().fail_class_listing = true;
    }

    pub fn fail_class_creation(&self) {
        self.state().fail_class_creation = true;
    }

    pub fn student(&self, student_id: StudentId) -> Option<Student> {
        self.state()
            .students
            .iter()
            .find(|s| s.id == student_id)
            .cloned()
    }

    pub fn class(&self, class_id: ClassId) -> Option<Class> {
        self.state()
            .classes
            .iter()
            .find(|c| c.id == class_id)
            .cloned()
    }

    pub fn classes_matching(&self, filter: ClassFilter) -> Vec<Class> {
        let mut classes: Vec<Class> = self
            .state()
            .classes
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        classes.sort_by(|a, b| a.section.cmp(&b.section));
        classes
    }

    pub fn internship_count(&self, student_id: StudentId) -> usize {
        self.state()
            .internships
            .iter()
            .filter(|i| i.student_id == student_id)
            .count()
    }

    pub fn final_work_count(&self, student_id: StudentId) -> usize {
        self.state()
            .final_works
            .iter()
            .filter(|f| f.student_id == student_id)
            .count()
    }
}

impl SchoolStore for MemoryStore {
    async fn list_classes(&self, filter: ClassFilter) -> Result<Vec<Class>, StoreError> {
        let state = self.state();
        if state.fail_class_listing {
            return Err(StoreError::Unavailable("class listing disabled".to_string()));
        }
        Ok(state
            .classes
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn list_classes_with_stats(
        &self,
        filter: ClassFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ClassWithStats>, i64), StoreError> {
        let state = self.state();
        if state.fail_class_listing {
            return Err(StoreError::Unavailable("class listing disabled".to_string()));
        }

        let mut matching: Vec<&Class> = state.classes.iter().filter(|c| filter.matches(c)).collect();
        matching.sort_by(|a, b| {
            b.academic_year
                .cmp(&a.academic_year)
                .then(a.grade_level.cmp(&b.grade_level))
                .then(a.section.cmp(&b.section))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|class| ClassWithStats {
                class: class.clone(),
                student_count: state.active_count(class.id),
            })
            .collect();

        Ok((page, total))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        Ok(self.state().courses.clone())
    }

    async fn list_active_students(&self, class_id: ClassId) -> Result<Vec<Student>, StoreError> {
        let state = self.state();
        if state.failing_student_listings.contains(&class_id) {
            return Err(StoreError::Unavailable(format!(
                "students of class {} unavailable",
                class_id
            )));
        }
        Ok(state
            .students
            .iter()
            .filter(|s| s.class_id == Some(class_id) && s.status == StudentStatus::Active)
            .cloned()
            .collect())
    }

    async fn list_grades(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        academic_year: i32,
    ) -> Result<Vec<Grade>, StoreError> {
        let state = self.state();
        if state.failing_grade_reads.contains(&student_id) {
            return Err(StoreError::Unavailable(format!(
                "grades of student {} unavailable",
                student_id
            )));
        }
        Ok(state
            .grades
            .iter()
            .filter(|g| {
                g.student_id == student_id
                    && g.class_id == class_id
                    && g.academic_year == academic_year
            })
            .cloned()
            .collect())
    }

    async fn create_class(&self, new_class: NewClass) -> Result<ClassId, StoreError> {
        let mut state = self.state();
        if state.fail_class_creation {
            return Err(StoreError::Unavailable("class creation disabled".to_string()));
        }

        let taken = state.classes.iter().any(|c| {
            c.course_id == new_class.course_id
                && c.grade_level == new_class.grade_level
                && c.section == new_class.section
                && c.period == new_class.period
                && c.academic_year == new_class.academic_year
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "class {}{} ({}) already exists for academic year {}",
                new_class.grade_level, new_class.section, new_class.period, new_class.academic_year
            )));
        }

        let id = ClassId::new();
        state.classes.push(new_class.into_class(id));
        Ok(id)
    }

    async fn update_student(
        &self,
        student_id: StudentId,
        update: StudentUpdate,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.failing_updates.contains(&student_id) {
            return Err(StoreError::Unavailable(format!(
                "update of student {} rejected",
                student_id
            )));
        }

        let student = state
            .students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| StoreError::NotFound(format!("student {}", student_id)))?;

        if let Some(class_id) = update.class_id {
            student.class_id = Some(class_id);
        }
        if let Some(status) = update.status {
            student.status = status;
        }
        Ok(())
    }

    async fn find_internship(
        &self,
        student_id: StudentId,
    ) -> Result<Option<InternshipId>, StoreError> {
        Ok(self
            .state()
            .internships
            .iter()
            .find(|i| i.student_id == student_id)
            .map(|i| i.id))
    }

    async fn create_internship(&self, student_id: StudentId) -> Result<InternshipId, StoreError> {
        let mut state = self.state();
        if state.failing_record_creations.contains(&student_id) {
            return Err(StoreError::Unavailable("internship creation disabled".to_string()));
        }
        if state.internships.iter().any(|i| i.student_id == student_id) {
            return Err(StoreError::Conflict(format!(
                "internship already exists for student {}",
                student_id
            )));
        }
        let id = InternshipId::new();
        state.internships.push(Internship {
            id,
            student_id,
            status: RecordStatus::Pending,
        });
        Ok(id)
    }

    async fn find_final_work(
        &self,
        student_id: StudentId,
    ) -> Result<Option<FinalWorkId>, StoreError> {
        Ok(self
            .state()
            .final_works
            .iter()
            .find(|f| f.student_id == student_id)
            .map(|f| f.id))
    }

    async fn create_final_work(&self, student_id: StudentId) -> Result<FinalWorkId, StoreError> {
        let mut state = self.state();
        if state.failing_record_creations.contains(&student_id) {
            return Err(StoreError::Unavailable("final work creation disabled".to_string()));
        }
        if state.final_works.iter().any(|f| f.student_id == student_id) {
            return Err(StoreError::Conflict(format!(
                "final work already exists for student {}",
                student_id
            )));
        }
        let id = FinalWorkId::new();
        state.final_works.push(FinalWork {
            id,
            student_id,
            status: RecordStatus::Pending,
        });
        Ok(id)
    }

    async fn count_active_students_in_class(&self, class_id: ClassId) -> Result<i64, StoreError> {
        Ok(self.state().active_count(class_id))
    }
}
