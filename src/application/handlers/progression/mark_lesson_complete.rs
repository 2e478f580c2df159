//! MarkLessonCompleteHandler - Command handler for completing a lesson.
//!
//! The completion insert and the enrollment recompute are one commit. The
//! handler reads a fresh enrollment and completion set, reduces the new
//! completion through the aggregate and commits with the version it read.
//! A lost race re-reads and tries again, up to `max_commit_retries` times.

use std::sync::Arc;

use crate::domain::catalog::CatalogTree;
use crate::domain::completion::LessonCompletion;
use crate::domain::enrollment::{Enrollment, EnrollmentEvent, ProgressionError};
use crate::domain::foundation::{CommandMetadata, CourseId, DomainError, LessonId, Timestamp};
use crate::domain::progression::CourseProgress;
use crate::ports::{
    CatalogReader, CompletionReader, EnrollmentChecker, EnrollmentRepository, EventPublisher,
};

use super::{ensure_enrolled, publish_committed};

/// Command to mark a lesson completed for the calling learner.
#[derive(Debug, Clone)]
pub struct MarkLessonCompleteCommand {
    pub lesson_id: LessonId,
    /// Course the client believes the lesson belongs to, if it sent one.
    pub course_id: Option<CourseId>,
}

#[derive(Debug, Clone)]
pub struct MarkLessonCompleteResult {
    /// True only for the call that inserted the completion.
    pub newly_completed: bool,
    pub enrollment: Enrollment,
    pub progress: CourseProgress,
}

pub struct MarkLessonCompleteHandler {
    catalog: Arc<dyn CatalogReader>,
    enrollment_checker: Arc<dyn EnrollmentChecker>,
    enrollments: Arc<dyn EnrollmentRepository>,
    completions: Arc<dyn CompletionReader>,
    event_publisher: Arc<dyn EventPublisher>,
    max_commit_retries: u32,
}

impl MarkLessonCompleteHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        enrollment_checker: Arc<dyn EnrollmentChecker>,
        enrollments: Arc<dyn EnrollmentRepository>,
        completions: Arc<dyn CompletionReader>,
        event_publisher: Arc<dyn EventPublisher>,
        max_commit_retries: u32,
    ) -> Self {
        Self {
            catalog,
            enrollment_checker,
            enrollments,
            completions,
            event_publisher,
            max_commit_retries,
        }
    }

    #[tracing::instrument(skip(self, metadata), fields(learner_id = %metadata.learner_id))]
    pub async fn handle(
        &self,
        cmd: MarkLessonCompleteCommand,
        metadata: CommandMetadata,
    ) -> Result<MarkLessonCompleteResult, ProgressionError> {
        // 1. Locate the lesson
        let location = self
            .catalog
            .find_lesson(&cmd.lesson_id)
            .await?
            .ok_or(ProgressionError::LessonNotFound(cmd.lesson_id))?;

        if let Some(claimed) = cmd.course_id {
            if claimed != location.course_id {
                return Err(ProgressionError::LessonOutsideCourse {
                    lesson_id: cmd.lesson_id,
                    course_id: claimed,
                });
            }
        }

        // 2. Only enrolled learners record progress
        let course_id = location.course_id;
        ensure_enrolled(
            self.enrollment_checker.as_ref(),
            &metadata.learner_id,
            &course_id,
        )
        .await?;

        // 3. Progress is measured against the tree as it is now
        let tree = self
            .catalog
            .load_tree(&course_id)
            .await?
            .ok_or(ProgressionError::CourseNotFound(course_id))?;

        let mut created = Vec::new();
        for attempt in 0..=self.max_commit_retries {
            let enrollment = match self
                .enrollments
                .find_by_learner_and_course(&metadata.learner_id, &course_id)
                .await?
            {
                Some(enrollment) => enrollment,
                None => {
                    // Enrolled according to the checker but no record here yet.
                    let (candidate, event) = Enrollment::enroll(
                        metadata.learner_id.clone(),
                        course_id,
                        Timestamp::now(),
                    );
                    let stored = self.enrollments.insert_if_absent(&candidate).await?;
                    if stored.id == candidate.id {
                        created.push(event);
                    }
                    stored
                }
            };

            match self.try_commit(enrollment, &tree, &cmd, &metadata).await {
                Ok((result, events)) => {
                    created.extend(events);
                    if created
                        .iter()
                        .any(|e| matches!(e, EnrollmentEvent::CourseCompleted(_)))
                    {
                        tracing::info!(
                            enrollment_id = %result.enrollment.id,
                            %course_id,
                            "Course completed, certificate eligible"
                        );
                    }
                    publish_committed(self.event_publisher.as_ref(), &metadata, &created).await;
                    return Ok(result);
                }
                Err(err) if err.is_conflict() => {
                    tracing::warn!(
                        attempt,
                        lesson_id = %cmd.lesson_id,
                        "Enrollment changed concurrently, retrying from a fresh read"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ProgressionError::conflict(format!(
            "progress commit for lesson {} lost {} races",
            cmd.lesson_id,
            self.max_commit_retries + 1
        )))
    }

    /// One read-reduce-commit pass from a freshly read enrollment.
    async fn try_commit(
        &self,
        mut enrollment: Enrollment,
        tree: &CatalogTree,
        cmd: &MarkLessonCompleteCommand,
        metadata: &CommandMetadata,
    ) -> Result<(MarkLessonCompleteResult, Vec<EnrollmentEvent>), DomainError> {
        let mut completions = self
            .completions
            .completions_for(&metadata.learner_id, &enrollment.course_id)
            .await?;

        let now = Timestamp::now();
        let completion = LessonCompletion::new(metadata.learner_id.clone(), cmd.lesson_id, now);
        let newly_completed = completions.record(&completion);

        let events = if newly_completed {
            enrollment.record_lesson_completed(&completion, tree, &completions, now)
        } else {
            // Repeat completion: still heal the cache if the tree moved on.
            enrollment.recompute(tree, &completions, now)
        };
        let progress = CourseProgress::compute(tree, &completions);

        if !events.is_empty() {
            enrollment.version = self
                .enrollments
                .commit_progress(&enrollment, newly_completed.then_some(&completion))
                .await?;
        }

        Ok((
            MarkLessonCompleteResult {
                newly_completed,
                enrollment,
                progress,
            },
            events,
        ))
    }
}
