//! Enrollment aggregate entity.
//!
//! One enrollment per (learner, course). It caches the learner's progress
//! and completion state and holds the issued certificate reference. The
//! cache is only ever rewritten from a fresh `CourseProgress`, never from
//! counts supplied by a client.
//!
//! # Design Decisions
//!
//! - **Edge-triggered completion**: `completed_at` and `CourseCompleted` are
//!   produced on the false to true transition only
//! - **Dilution kept**: lessons added later lower the percentage and can
//!   revert `completed`; `completed_at` is cleared until the next edge
//! - **Optimistic concurrency**: `version` is compared and bumped by the
//!   repository on every progress commit

use serde::{Deserialize, Serialize};

use super::{
    CertificateIssued, CourseCompleted, EnrollmentCreated, EnrollmentEvent, LessonCompleted,
    ProgressUpdated, ProgressionError,
};
use crate::domain::catalog::CatalogTree;
use crate::domain::certificate::CertificateStatus;
use crate::domain::completion::{CompletionSet, LessonCompletion};
use crate::domain::foundation::{
    CertificateRef, CourseId, EnrollmentId, EventId, LearnerId, Percentage, StateMachine,
    Timestamp,
};
use crate::domain::progression::CourseProgress;

/// A learner's registration in a course.
///
/// # Invariants
///
/// - `(learner_id, course_id)` is unique
/// - `completed` implies `completed_at.is_some()`
/// - `certificate_ref`, once set, never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub progress: Percentage,
    pub completed: bool,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub certificate_ref: Option<CertificateRef>,
    /// Bumped by every committed progress write.
    pub version: i64,
}

impl Enrollment {
    /// Enrolls a learner with zero progress.
    pub fn enroll(
        learner_id: LearnerId,
        course_id: CourseId,
        now: Timestamp,
    ) -> (Self, EnrollmentEvent) {
        let enrollment = Self {
            id: EnrollmentId::new(),
            learner_id,
            course_id,
            progress: Percentage::ZERO,
            completed: false,
            enrolled_at: now,
            completed_at: None,
            certificate_ref: None,
            version: 0,
        };
        let event = EnrollmentEvent::Created(EnrollmentCreated {
            event_id: EventId::new(),
            enrollment_id: enrollment.id,
            learner_id: enrollment.learner_id.clone(),
            course_id,
            enrolled_at: now,
        });
        (enrollment, event)
    }

    pub fn certificate_status(&self) -> CertificateStatus {
        CertificateStatus::of(self)
    }

    /// Reduces a newly recorded completion into the cached progress.
    ///
    /// `completions` must already contain `completion`.
    pub fn record_lesson_completed(
        &mut self,
        completion: &LessonCompletion,
        tree: &CatalogTree,
        completions: &CompletionSet,
        now: Timestamp,
    ) -> Vec<EnrollmentEvent> {
        let mut events = vec![EnrollmentEvent::LessonCompleted(LessonCompleted {
            event_id: EventId::new(),
            enrollment_id: self.id,
            learner_id: completion.learner_id.clone(),
            course_id: self.course_id,
            lesson_id: completion.lesson_id,
            completed_at: completion.completed_at,
        })];
        events.extend(self.recompute(tree, completions, now));
        events
    }

    /// Recomputes progress against the current tree.
    pub fn recompute(
        &mut self,
        tree: &CatalogTree,
        completions: &CompletionSet,
        now: Timestamp,
    ) -> Vec<EnrollmentEvent> {
        self.apply_progress(&CourseProgress::compute(tree, completions), now)
    }

    /// Stores freshly computed progress and reports what changed.
    pub fn apply_progress(
        &mut self,
        progress: &CourseProgress,
        now: Timestamp,
    ) -> Vec<EnrollmentEvent> {
        let previous_percent = self.progress;
        let was_completed = self.completed;

        self.progress = progress.percent;
        self.completed = progress.completed;

        let mut events = Vec::new();
        if previous_percent == self.progress && was_completed == self.completed {
            return events;
        }

        events.push(EnrollmentEvent::ProgressUpdated(ProgressUpdated {
            event_id: EventId::new(),
            enrollment_id: self.id,
            course_id: self.course_id,
            previous_percent,
            progress_percent: self.progress,
            completed: self.completed,
            updated_at: now,
        }));

        match (was_completed, self.completed) {
            (false, true) => {
                self.completed_at = Some(now);
                events.push(EnrollmentEvent::CourseCompleted(CourseCompleted {
                    event_id: EventId::new(),
                    enrollment_id: self.id,
                    learner_id: self.learner_id.clone(),
                    course_id: self.course_id,
                    completed_at: now,
                }));
            }
            (true, false) => self.completed_at = None,
            _ => {}
        }

        events
    }

    /// Records the rendered certificate.
    ///
    /// # Errors
    ///
    /// - `NotEligible` while the course is not completed
    /// - `Conflict` if a certificate was already issued
    pub fn issue_certificate(
        &mut self,
        reference: CertificateRef,
        now: Timestamp,
    ) -> Result<CertificateIssued, ProgressionError> {
        let status = self.certificate_status();
        if status.transition_to(CertificateStatus::Issued).is_err() {
            return Err(match status {
                CertificateStatus::Issued => ProgressionError::conflict(format!(
                    "certificate already issued for {}",
                    self.id
                )),
                _ => ProgressionError::NotEligible(self.course_id),
            });
        }

        self.certificate_ref = Some(reference.clone());
        Ok(CertificateIssued {
            event_id: EventId::new(),
            enrollment_id: self.id,
            learner_id: self.learner_id.clone(),
            course_id: self.course_id,
            certificate_ref: reference,
            issued_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::two_module_course;
    use crate::domain::catalog::Lesson;
    use crate::domain::foundation::LessonId;

    fn learner() -> LearnerId {
        LearnerId::new("learner-42").unwrap()
    }

    fn enrollment(course_id: CourseId) -> Enrollment {
        Enrollment::enroll(learner(), course_id, Timestamp::now()).0
    }

    fn complete(
        enrollment: &mut Enrollment,
        tree: &CatalogTree,
        completions: &mut CompletionSet,
        lesson_id: LessonId,
    ) -> Vec<EnrollmentEvent> {
        let completion = LessonCompletion::new(learner(), lesson_id, Timestamp::now());
        if completions.record(&completion) {
            enrollment.record_lesson_completed(&completion, tree, completions, Timestamp::now())
        } else {
            enrollment.recompute(tree, completions, Timestamp::now())
        }
    }

    fn kinds(events: &[EnrollmentEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.event_type()).collect()
    }

    #[test]
    fn enroll_starts_at_zero() {
        let course_id = CourseId::new();
        let (enrollment, event) = Enrollment::enroll(learner(), course_id, Timestamp::now());

        assert_eq!(enrollment.progress, Percentage::ZERO);
        assert!(!enrollment.completed);
        assert_eq!(enrollment.version, 0);
        assert_eq!(enrollment.certificate_status(), CertificateStatus::NotEligible);
        assert_eq!(event.event_type(), "enrollment.created.v1");
    }

    #[test]
    fn completing_twice_counts_once() {
        let c = two_module_course();
        let mut e = enrollment(c.tree.course_id());
        let mut completions = CompletionSet::new();

        let first = complete(&mut e, &c.tree, &mut completions, c.l1);
        let second = complete(&mut e, &c.tree, &mut completions, c.l1);

        assert_eq!(e.progress.value(), 33);
        assert_eq!(
            kinds(&first),
            vec!["lesson.completed.v1", "enrollment.progress_updated.v1"]
        );
        assert!(second.is_empty());
    }

    #[test]
    fn finishing_the_course_fires_completion_once() {
        let c = two_module_course();
        let mut e = enrollment(c.tree.course_id());
        let mut completions = CompletionSet::new();

        complete(&mut e, &c.tree, &mut completions, c.l1);
        complete(&mut e, &c.tree, &mut completions, c.l2);
        let last = complete(&mut e, &c.tree, &mut completions, c.l3);
        let stamped = e.completed_at;
        let again = complete(&mut e, &c.tree, &mut completions, c.l3);

        assert!(e.completed);
        assert_eq!(e.progress, Percentage::HUNDRED);
        assert!(kinds(&last).contains(&"enrollment.course_completed.v1"));
        assert!(again.is_empty());
        assert_eq!(e.completed_at, stamped);
        assert_eq!(e.certificate_status(), CertificateStatus::Eligible);
    }

    #[test]
    fn added_lesson_dilutes_and_reverts_completion() {
        let c = two_module_course();
        let mut e = enrollment(c.tree.course_id());
        let mut completions = CompletionSet::new();
        for lesson in [c.l1, c.l2, c.l3] {
            complete(&mut e, &c.tree, &mut completions, lesson);
        }

        let l4 = Lesson::new(LessonId::new(), c.m2, "Grounding", 2);
        let l4_id = l4.id;
        let mut lessons = c.tree.lessons().to_vec();
        lessons.push(l4);
        let modules = c.tree.modules().map(|m| m.module.clone()).collect();
        let grown = CatalogTree::build(c.tree.course().clone(), modules, lessons);

        let events = e.recompute(&grown, &completions, Timestamp::now());

        assert_eq!(e.progress.value(), 75);
        assert!(!e.completed);
        assert!(e.completed_at.is_none());
        assert!(matches!(&events[0], EnrollmentEvent::ProgressUpdated(p) if p.is_dilution()));

        let events = complete(&mut e, &grown, &mut completions, l4_id);
        assert!(e.completed);
        assert!(e.completed_at.is_some());
        assert!(kinds(&events).contains(&"enrollment.course_completed.v1"));
    }

    #[test]
    fn certificate_requires_completion() {
        let c = two_module_course();
        let mut e = enrollment(c.tree.course_id());
        let reference = CertificateRef::new("cert-1").unwrap();

        let result = e.issue_certificate(reference, Timestamp::now());

        assert_eq!(result, Err(ProgressionError::NotEligible(e.course_id)));
        assert!(e.certificate_ref.is_none());
    }

    #[test]
    fn certificate_is_issued_once() {
        let c = two_module_course();
        let mut e = enrollment(c.tree.course_id());
        let mut completions = CompletionSet::new();
        for lesson in [c.l1, c.l2, c.l3] {
            complete(&mut e, &c.tree, &mut completions, lesson);
        }

        let issued = e
            .issue_certificate(CertificateRef::new("cert-1").unwrap(), Timestamp::now())
            .unwrap();
        let again = e.issue_certificate(CertificateRef::new("cert-2").unwrap(), Timestamp::now());

        assert_eq!(issued.certificate_ref.as_str(), "cert-1");
        assert!(matches!(again, Err(ProgressionError::Conflict(_))));
        assert_eq!(e.certificate_ref.as_ref().map(|r| r.as_str()), Some("cert-1"));
        assert_eq!(e.certificate_status(), CertificateStatus::Issued);
    }
}
