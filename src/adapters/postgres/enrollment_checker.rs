//! PostgreSQL implementation of EnrollmentChecker.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{CourseId, DomainError, LearnerId};
use crate::ports::EnrollmentChecker;

/// Answers enrollment checks from the `enrollments` table.
pub struct PostgresEnrollmentChecker {
    pool: PgPool,
}

impl PostgresEnrollmentChecker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentChecker for PostgresEnrollmentChecker {
    async fn is_enrolled(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE learner_id = $1 AND course_id = $2)",
        )
        .bind(learner_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to check enrollment", e))?;

        Ok(exists)
    }
}
