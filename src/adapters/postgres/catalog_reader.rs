//! PostgreSQL implementation of CatalogReader.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::{CatalogTree, Course, CourseSlug, Lesson, LessonLocation, Module};
use crate::domain::foundation::{CourseId, DomainError, LessonId, ModuleId};
use crate::ports::CatalogReader;

/// Reads course structure from the catalog tables.
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    slug: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ModuleRow {
    id: Uuid,
    course_id: Uuid,
    title: String,
    order_index: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: Uuid,
    module_id: Uuid,
    title: String,
    order_index: i32,
    is_free: bool,
    duration_minutes: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
struct LessonLocationRow {
    lesson_id: Uuid,
    module_id: Uuid,
    course_id: Uuid,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let slug = CourseSlug::new(row.slug)
            .map_err(|e| DomainError::database("Invalid course slug in catalog", e))?;
        Ok(Course::new(CourseId::from_uuid(row.id), row.title, slug))
    }
}

impl From<ModuleRow> for Module {
    fn from(row: ModuleRow) -> Self {
        Module::new(
            ModuleId::from_uuid(row.id),
            CourseId::from_uuid(row.course_id),
            row.title,
            row.order_index,
        )
    }
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Lesson {
            id: LessonId::from_uuid(row.id),
            module_id: ModuleId::from_uuid(row.module_id),
            title: row.title,
            order_index: row.order_index,
            is_free: row.is_free,
            duration_minutes: row.duration_minutes.and_then(|m| u32::try_from(m).ok()),
        }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn load_tree(&self, course_id: &CourseId) -> Result<Option<CatalogTree>, DomainError> {
        let course: Option<CourseRow> =
            sqlx::query_as("SELECT id, title, slug FROM courses WHERE id = $1")
                .bind(course_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to load course", e))?;

        let Some(course) = course else {
            return Ok(None);
        };

        // Creation order; the tree applies order_index with a stable sort.
        let modules: Vec<ModuleRow> = sqlx::query_as(
            r#"
            SELECT id, course_id, title, order_index
            FROM course_modules
            WHERE course_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load modules", e))?;

        let lessons: Vec<LessonRow> = sqlx::query_as(
            r#"
            SELECT l.id, l.module_id, l.title, l.order_index, l.is_free, l.duration_minutes
            FROM lessons l
            JOIN course_modules m ON m.id = l.module_id
            WHERE m.course_id = $1
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load lessons", e))?;

        Ok(Some(CatalogTree::build(
            Course::try_from(course)?,
            modules.into_iter().map(Module::from).collect(),
            lessons.into_iter().map(Lesson::from).collect(),
        )))
    }

    async fn find_lesson(
        &self,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonLocation>, DomainError> {
        let row: Option<LessonLocationRow> = sqlx::query_as(
            r#"
            SELECT l.id AS lesson_id, l.module_id, m.course_id
            FROM lessons l
            JOIN course_modules m ON m.id = l.module_id
            WHERE l.id = $1
            "#,
        )
        .bind(lesson_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find lesson", e))?;

        Ok(row.map(|r| LessonLocation {
            course_id: CourseId::from_uuid(r.course_id),
            module_id: ModuleId::from_uuid(r.module_id),
            lesson_id: LessonId::from_uuid(r.lesson_id),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_row_drops_negative_duration() {
        let lesson = Lesson::from(LessonRow {
            id: Uuid::new_v4(),
            module_id: Uuid::new_v4(),
            title: "Sleep".to_string(),
            order_index: 1,
            is_free: true,
            duration_minutes: Some(-5),
        });
        assert_eq!(lesson.duration_minutes, None);
        assert!(lesson.is_free);
    }

    #[test]
    fn course_row_rejects_invalid_slug() {
        let row = CourseRow {
            id: Uuid::new_v4(),
            title: "Bad".to_string(),
            slug: "Not A Slug".to_string(),
        };
        assert!(Course::try_from(row).is_err());
    }
}
