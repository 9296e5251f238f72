use sqlx::PgPool;
use tracing::instrument;

use scholaris_models::ids::{ClassId, FinalWorkId, InternshipId, StudentId};
use scholaris_models::{
    Class, ClassFilter, ClassWithStats, Course, Grade, NewClass, Student, StudentStatus,
    StudentUpdate,
};

use super::{SchoolStore, StoreError};

const CLASS_FILTER_SQL: &str = r#"($1::int IS NULL OR c.academic_year = $1)
               AND ($2::uuid IS NULL OR c.course_id = $2)
               AND ($3::smallint IS NULL OR c.grade_level = $3)"#;

/// [`SchoolStore`] backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_unique_violation(e: sqlx::Error, message: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(message.to_string());
    }
    StoreError::from(e)
}

impl SchoolStore for PgStore {
    #[instrument(skip(self))]
    async fn list_classes(&self, filter: ClassFilter) -> Result<Vec<Class>, StoreError> {
        let query = format!(
            r#"SELECT c.id, c.course_id, c.grade_level, c.section, c.academic_year,
                      c.period, c.max_students, c.class_director_id
               FROM classes c
               WHERE {CLASS_FILTER_SQL}
               ORDER BY c.grade_level, c.section"#
        );

        let classes = sqlx::query_as::<_, Class>(&query)
            .bind(filter.academic_year)
            .bind(filter.course_id)
            .bind(filter.grade_level)
            .fetch_all(&self.pool)
            .await?;

        Ok(classes)
    }

    #[instrument(skip(self))]
    async fn list_classes_with_stats(
        &self,
        filter: ClassFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ClassWithStats>, i64), StoreError> {
        let count_query = format!("SELECT COUNT(*) FROM classes c WHERE {CLASS_FILTER_SQL}");

        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(filter.academic_year)
            .bind(filter.course_id)
            .bind(filter.grade_level)
            .fetch_one(&self.pool)
            .await?;

        let data_query = format!(
            r#"SELECT
                c.id,
                c.course_id,
                c.grade_level,
                c.section,
                c.academic_year,
                c.period,
                c.max_students,
                c.class_director_id,
                COUNT(s.id) AS student_count
               FROM classes c
               LEFT JOIN students s ON s.class_id = c.id AND s.status = 'active'
               WHERE {CLASS_FILTER_SQL}
               GROUP BY c.id
               ORDER BY c.academic_year DESC, c.grade_level, c.section
               LIMIT $4 OFFSET $5"#
        );

        let classes = sqlx::query_as::<_, ClassWithStats>(&data_query)
            .bind(filter.academic_year)
            .bind(filter.course_id)
            .bind(filter.grade_level)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((classes, total))
    }

    #[instrument(skip(self))]
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let courses =
            sqlx::query_as::<_, Course>("SELECT id, name, code FROM courses ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(courses)
    }

    #[instrument(skip(self))]
    async fn list_active_students(&self, class_id: ClassId) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, full_name, class_id, status
               FROM students
               WHERE class_id = $1 AND status = $2
               ORDER BY full_name"#,
        )
        .bind(class_id)
        .bind(StudentStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    #[instrument(skip(self))]
    async fn list_grades(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        academic_year: i32,
    ) -> Result<Vec<Grade>, StoreError> {
        let grades = sqlx::query_as::<_, Grade>(
            r#"SELECT id, student_id, class_id, subject_id, trimester, mt, academic_year
               FROM grades
               WHERE student_id = $1 AND class_id = $2 AND academic_year = $3"#,
        )
        .bind(student_id)
        .bind(class_id)
        .bind(academic_year)
        .fetch_all(&self.pool)
        .await?;

        Ok(grades)
    }

    #[instrument(skip(self))]
    async fn create_class(&self, new_class: NewClass) -> Result<ClassId, StoreError> {
        let id = sqlx::query_scalar::<_, ClassId>(
            r#"INSERT INTO classes
                   (course_id, grade_level, section, academic_year, period, max_students, class_director_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(new_class.course_id)
        .bind(new_class.grade_level)
        .bind(&new_class.section)
        .bind(new_class.academic_year)
        .bind(new_class.period)
        .bind(new_class.max_students)
        .bind(new_class.class_director_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                &format!(
                    "class {}{} ({}) already exists for academic year {}",
                    new_class.grade_level,
                    new_class.section,
                    new_class.period,
                    new_class.academic_year
                ),
            )
        })?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn update_student(
        &self,
        student_id: StudentId,
        update: StudentUpdate,
    ) -> Result<(), StoreError> {
        if update.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(
            r#"UPDATE students
               SET class_id = COALESCE($1, class_id),
                   status = COALESCE($2, status),
                   updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(update.class_id)
        .bind(update.status)
        .bind(student_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("student {}", student_id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_internship(
        &self,
        student_id: StudentId,
    ) -> Result<Option<InternshipId>, StoreError> {
        let id = sqlx::query_scalar::<_, InternshipId>(
            "SELECT id FROM internships WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn create_internship(&self, student_id: StudentId) -> Result<InternshipId, StoreError> {
        sqlx::query_scalar::<_, InternshipId>(
            "INSERT INTO internships (student_id) VALUES ($1) RETURNING id",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, &format!("internship already exists for student {}", student_id))
        })
    }

    #[instrument(skip(self))]
    async fn find_final_work(
        &self,
        student_id: StudentId,
    ) -> Result<Option<FinalWorkId>, StoreError> {
        let id = sqlx::query_scalar::<_, FinalWorkId>(
            "SELECT id FROM final_works WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn create_final_work(&self, student_id: StudentId) -> Result<FinalWorkId, StoreError> {
        sqlx::query_scalar::<_, FinalWorkId>(
            "INSERT INTO final_works (student_id) VALUES ($1) RETURNING id",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, &format!("final work already exists for student {}", student_id))
        })
    }

    #[instrument(skip(self))]
    async fn count_active_students_in_class(&self, class_id: ClassId) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE class_id = $1 AND status = $2",
        )
        .bind(class_id)
        .bind(StudentStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
