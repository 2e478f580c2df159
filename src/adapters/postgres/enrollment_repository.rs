//! PostgreSQL implementation of EnrollmentRepository and CompletionReader.
//!
//! Completion rows and enrollment progress live in the same database so a
//! progress commit is one transaction: insert the completion, then update
//! the enrollment only if its version is still the one the caller read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::completion::{CompletionSet, LessonCompletion};
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    CertificateRef, CourseId, DomainError, EnrollmentId, ErrorCode, LearnerId, LessonId,
    Percentage, Timestamp,
};
use crate::ports::{CertificateClaim, CompletionReader, EnrollmentRepository};

/// PostgreSQL implementation of the enrollment and completion ports.
pub struct PostgresEnrollmentRepository {
    pool: PgPool,
}

impl PostgresEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ENROLLMENT_COLUMNS: &str = "id, learner_id, course_id, progress_percent, completed, \
     enrolled_at, completed_at, certificate_ref, version";

/// Database row representation of an enrollment.
#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    id: Uuid,
    learner_id: String,
    course_id: Uuid,
    progress_percent: i16,
    completed: bool,
    enrolled_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    certificate_ref: Option<String>,
    version: i64,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = DomainError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let learner_id = LearnerId::new(row.learner_id)
            .map_err(|e| DomainError::database("Invalid learner_id in enrollments", e))?;
        let progress = u8::try_from(row.progress_percent)
            .map_err(|e| DomainError::database("Invalid progress_percent", e))
            .and_then(|p| {
                Percentage::try_new(p)
                    .map_err(|e| DomainError::database("Invalid progress_percent", e))
            })?;
        let certificate_ref = row
            .certificate_ref
            .map(CertificateRef::new)
            .transpose()
            .map_err(|e| DomainError::database("Invalid certificate_ref", e))?;

        Ok(Enrollment {
            id: EnrollmentId::from_uuid(row.id),
            learner_id,
            course_id: CourseId::from_uuid(row.course_id),
            progress,
            completed: row.completed,
            enrolled_at: Timestamp::from_datetime(row.enrolled_at),
            completed_at: row.completed_at.map(Timestamp::from_datetime),
            certificate_ref,
            version: row.version,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompletionRow {
    lesson_id: Uuid,
    completed_at: DateTime<Utc>,
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn insert_if_absent(&self, enrollment: &Enrollment) -> Result<Enrollment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (
                id, learner_id, course_id, progress_percent, completed,
                enrolled_at, completed_at, certificate_ref, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (learner_id, course_id) DO NOTHING
            "#,
        )
        .bind(enrollment.id.as_uuid())
        .bind(enrollment.learner_id.as_str())
        .bind(enrollment.course_id.as_uuid())
        .bind(i16::from(enrollment.progress.value()))
        .bind(enrollment.completed)
        .bind(enrollment.enrolled_at.as_datetime())
        .bind(enrollment.completed_at.map(|t| *t.as_datetime()))
        .bind(enrollment.certificate_ref.as_ref().map(|r| r.as_str()))
        .bind(enrollment.version)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert enrollment", e))?;

        self.find_by_learner_and_course(&enrollment.learner_id, &enrollment.course_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::EnrollmentNotFound, "Enrollment vanished after insert")
            })
    }

    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let row: Option<EnrollmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM enrollments WHERE id = $1",
            ENROLLMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find enrollment", e))?;

        row.map(Enrollment::try_from).transpose()
    }

    async fn find_by_learner_and_course(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let row: Option<EnrollmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM enrollments WHERE learner_id = $1 AND course_id = $2",
            ENROLLMENT_COLUMNS
        ))
        .bind(learner_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find enrollment", e))?;

        row.map(Enrollment::try_from).transpose()
    }

    async fn commit_progress(
        &self,
        enrollment: &Enrollment,
        completion: Option<&LessonCompletion>,
    ) -> Result<i64, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        if let Some(completion) = completion {
            sqlx::query(
                r#"
                INSERT INTO lesson_completions (learner_id, lesson_id, completed_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (learner_id, lesson_id) DO NOTHING
                "#,
            )
            .bind(completion.learner_id.as_str())
            .bind(completion.lesson_id.as_uuid())
            .bind(completion.completed_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to record completion", e))?;
        }

        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE enrollments SET
                progress_percent = $2,
                completed = $3,
                completed_at = $4,
                version = version + 1
            WHERE id = $1 AND version = $5
            RETURNING version
            "#,
        )
        .bind(enrollment.id.as_uuid())
        .bind(i16::from(enrollment.progress.value()))
        .bind(enrollment.completed)
        .bind(enrollment.completed_at.map(|t| *t.as_datetime()))
        .bind(enrollment.version)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to update enrollment", e))?;

        let Some(new_version) = new_version else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM enrollments WHERE id = $1)")
                    .bind(enrollment.id.as_uuid())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| DomainError::database("Failed to check enrollment", e))?;
            // Dropping the transaction rolls back the completion insert.
            return Err(if exists {
                DomainError::new(
                    ErrorCode::Conflict,
                    format!(
                        "Enrollment {} changed since version {}",
                        enrollment.id, enrollment.version
                    ),
                )
            } else {
                DomainError::new(ErrorCode::EnrollmentNotFound, "Enrollment not found")
            });
        };

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit progress", e))?;

        Ok(new_version)
    }

    async fn claim_certificate(
        &self,
        id: &EnrollmentId,
        reference: &CertificateRef,
    ) -> Result<CertificateClaim, DomainError> {
        let result = sqlx::query(
            "UPDATE enrollments SET certificate_ref = $2 WHERE id = $1 AND certificate_ref IS NULL",
        )
        .bind(id.as_uuid())
        .bind(reference.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to claim certificate", e))?;

        if result.rows_affected() == 1 {
            return Ok(CertificateClaim::Claimed);
        }

        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT certificate_ref FROM enrollments WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to read certificate", e))?;

        match stored {
            None => Err(DomainError::new(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
            Some(Some(existing)) => CertificateRef::new(existing)
                .map(CertificateClaim::AlreadyIssued)
                .map_err(|e| DomainError::database("Invalid certificate_ref", e)),
            Some(None) => Err(DomainError::new(
                ErrorCode::Conflict,
                "Certificate claim lost without a stored reference",
            )),
        }
    }
}

#[async_trait]
impl CompletionReader for PostgresEnrollmentRepository {
    async fn completions_for(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<CompletionSet, DomainError> {
        let rows: Vec<CompletionRow> = sqlx::query_as(
            r#"
            SELECT lc.lesson_id, lc.completed_at
            FROM lesson_completions lc
            JOIN lessons l ON l.id = lc.lesson_id
            JOIN course_modules m ON m.id = l.module_id
            WHERE lc.learner_id = $1 AND m.course_id = $2
            "#,
        )
        .bind(learner_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load completions", e))?;

        Ok(rows
            .into_iter()
            .map(|r| (LessonId::from_uuid(r.lesson_id), Timestamp::from_datetime(r.completed_at)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> EnrollmentRow {
        EnrollmentRow {
            id: Uuid::new_v4(),
            learner_id: "learner-1".to_string(),
            course_id: Uuid::new_v4(),
            progress_percent: 67,
            completed: false,
            enrolled_at: Utc::now(),
            completed_at: None,
            certificate_ref: None,
            version: 4,
        }
    }

    #[test]
    fn row_converts_to_enrollment() {
        let enrollment = Enrollment::try_from(row()).unwrap();
        assert_eq!(enrollment.progress.value(), 67);
        assert_eq!(enrollment.version, 4);
        assert!(enrollment.certificate_ref.is_none());
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        let mut bad = row();
        bad.progress_percent = 130;
        assert!(Enrollment::try_from(bad).is_err());

        let mut negative = row();
        negative.progress_percent = -1;
        assert!(Enrollment::try_from(negative).is_err());
    }

    #[test]
    fn blank_learner_is_rejected() {
        let mut bad = row();
        bad.learner_id = "  ".to_string();
        let err = Enrollment::try_from(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
