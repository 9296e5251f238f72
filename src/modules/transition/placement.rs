//! Destination class resolution.
//!
//! Candidates for a (course, grade level, year) are tried in section order and
//! the first one below capacity wins. When every candidate is full a new
//! section is opened after the last existing letter. Gaps are never filled:
//! with sections `A` and `C` the next one is `D`.

use tracing::instrument;

use scholaris_config::TransitionConfig;
use scholaris_models::ids::{ClassId, CourseId};
use scholaris_models::{Class, GradeLevel, NewClass};

use super::error::TransitionError;
use crate::store::SchoolStore;

/// Classes known to exist during one run.
///
/// Loaded once from the store and extended with every class the run opens, so
/// later placements see earlier creations without re-reading.
#[derive(Debug, Default)]
pub struct ClassCache {
    classes: Vec<Class>,
    created: u32,
}

impl ClassCache {
    pub fn new(classes: Vec<Class>) -> Self {
        Self {
            classes,
            created: 0,
        }
    }

    /// Classes matching the key, ordered by section.
    pub fn candidates(&self, course_id: CourseId, grade_level: i16, academic_year: i32) -> Vec<&Class> {
        let mut matching: Vec<&Class> = self
            .classes
            .iter()
            .filter(|c| {
                c.course_id == course_id
                    && c.grade_level == grade_level
                    && c.academic_year == academic_year
            })
            .collect();
        matching.sort_by(|a, b| a.section.cmp(&b.section));
        matching
    }

    pub fn last_section(
        &self,
        course_id: CourseId,
        grade_level: i16,
        academic_year: i32,
    ) -> Option<&str> {
        self.candidates(course_id, grade_level, academic_year)
            .last()
            .map(|c| c.section.as_str())
    }

    /// Records a class opened during the run.
    pub fn insert(&mut self, class: Class) {
        self.classes.push(class);
        self.created += 1;
    }

    pub fn created_count(&self) -> u32 {
        self.created
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Section letter that follows `last`, or `A` when there is none.
pub fn next_section(
    last: Option<&str>,
    course_id: CourseId,
    grade_level: GradeLevel,
) -> Result<String, TransitionError> {
    let Some(last) = last else {
        return Ok("A".to_string());
    };

    let mut chars = last.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => c,
        _ => return Err(TransitionError::InvalidSection(last.to_string())),
    };

    if letter == 'Z' {
        return Err(TransitionError::SectionsExhausted {
            course_id,
            grade_level: grade_level.as_i16(),
        });
    }

    Ok(char::from(letter as u8 + 1).to_string())
}

pub struct PlacementEngine<'a, S> {
    store: &'a S,
    config: TransitionConfig,
}

impl<'a, S: SchoolStore> PlacementEngine<'a, S> {
    pub fn new(store: &'a S, config: TransitionConfig) -> Self {
        Self { store, config }
    }

    /// First class of the key with room for one more active student, opening a
    /// new section when all are full.
    #[instrument(skip(self, cache))]
    pub async fn resolve_destination_class(
        &self,
        cache: &mut ClassCache,
        course_id: CourseId,
        grade_level: GradeLevel,
        academic_year: i32,
    ) -> Result<ClassId, TransitionError> {
        let level = grade_level.as_i16();

        for candidate in cache.candidates(course_id, level, academic_year) {
            let enrolled = self
                .store
                .count_active_students_in_class(candidate.id)
                .await?;
            if enrolled < candidate.capacity(self.config.default_max_students) {
                return Ok(candidate.id);
            }
        }

        let section = next_section(
            cache.last_section(course_id, level, academic_year),
            course_id,
            grade_level,
        )?;

        let new_class = NewClass {
            course_id,
            grade_level: level,
            section,
            academic_year,
            period: self.config.default_period,
            max_students: Some(self.config.default_max_students),
            class_director_id: None,
        };
        let id = self.store.create_class(new_class.clone()).await?;
        let class = new_class.into_class(id);

        tracing::info!(
            class.id = %id,
            class.name = %class.name(),
            course.id = %course_id,
            academic_year,
            "Opened class section"
        );

        cache.insert(class);
        Ok(id)
    }
}
