//! Catalog reader port.
//!
//! The content-management subsystem owns courses, modules and lessons.
//! The engine only reads them, one course snapshot per request.

use async_trait::async_trait;

use crate::domain::catalog::{CatalogTree, LessonLocation};
use crate::domain::foundation::{CourseId, DomainError, LessonId};

/// Read access to course structure.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Loads the ordered tree of a course.
    ///
    /// Returns `None` if the course does not exist. A course without
    /// modules is returned as an empty tree.
    async fn load_tree(&self, course_id: &CourseId) -> Result<Option<CatalogTree>, DomainError>;

    /// Finds the module and course a lesson belongs to.
    ///
    /// Returns `None` if the lesson does not exist.
    async fn find_lesson(
        &self,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonLocation>, DomainError>;
}
