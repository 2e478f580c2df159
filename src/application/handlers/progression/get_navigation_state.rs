//! GetNavigationStateHandler - Query handler for the course player.
//!
//! Resolves the current lesson, its neighbours and the visible outline for
//! a view mode. Pure over the catalog tree and the learner's completions.

use std::sync::Arc;

use crate::domain::enrollment::ProgressionError;
use crate::domain::foundation::{CourseId, LearnerId, LessonId};
use crate::domain::progression::{NavigationState, ViewMode};
use crate::ports::{CatalogReader, CompletionReader, EnrollmentChecker};

use super::ensure_enrolled;

#[derive(Debug, Clone)]
pub struct GetNavigationStateQuery {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub mode: ViewMode,
    /// Lesson the client currently has open.
    pub lesson_id: Option<LessonId>,
}

pub struct GetNavigationStateHandler {
    catalog: Arc<dyn CatalogReader>,
    enrollment_checker: Arc<dyn EnrollmentChecker>,
    completions: Arc<dyn CompletionReader>,
}

impl GetNavigationStateHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        enrollment_checker: Arc<dyn EnrollmentChecker>,
        completions: Arc<dyn CompletionReader>,
    ) -> Self {
        Self {
            catalog,
            enrollment_checker,
            completions,
        }
    }

    pub async fn handle(
        &self,
        query: GetNavigationStateQuery,
    ) -> Result<NavigationState, ProgressionError> {
        ensure_enrolled(
            self.enrollment_checker.as_ref(),
            &query.learner_id,
            &query.course_id,
        )
        .await?;

        let tree = self
            .catalog
            .load_tree(&query.course_id)
            .await?
            .ok_or(ProgressionError::CourseNotFound(query.course_id))?;

        let completions = self
            .completions
            .completions_for(&query.learner_id, &query.course_id)
            .await?
            .restricted_to(&tree);

        Ok(NavigationState::resolve(
            &tree,
            &completions,
            query.mode,
            query.lesson_id,
        ))
    }
}
