//! Completion module - Per-learner lesson completion facts.
//!
//! Completions are append-only. Recording the same (learner, lesson) pair
//! twice keeps the first fact and reports that nothing changed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::catalog::CatalogTree;
use crate::domain::foundation::{LearnerId, LessonId, Timestamp};

/// A learner finished a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompletion {
    pub learner_id: LearnerId,
    pub lesson_id: LessonId,
    pub completed_at: Timestamp,
}

impl LessonCompletion {
    pub fn new(learner_id: LearnerId, lesson_id: LessonId, completed_at: Timestamp) -> Self {
        Self {
            learner_id,
            lesson_id,
            completed_at,
        }
    }
}

/// The lessons one learner has completed, keyed by lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    completed: HashMap<LessonId, Timestamp>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completion. Returns false if the lesson was already complete.
    pub fn insert(&mut self, lesson_id: LessonId, completed_at: Timestamp) -> bool {
        if self.completed.contains_key(&lesson_id) {
            return false;
        }
        self.completed.insert(lesson_id, completed_at);
        true
    }

    /// Records a completion fact.
    pub fn record(&mut self, completion: &LessonCompletion) -> bool {
        self.insert(completion.lesson_id, completion.completed_at)
    }

    pub fn contains(&self, lesson_id: LessonId) -> bool {
        self.completed.contains_key(&lesson_id)
    }

    pub fn completed_at(&self, lesson_id: LessonId) -> Option<Timestamp> {
        self.completed.get(&lesson_id).copied()
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Number of completions that point at a lesson in `tree`.
    ///
    /// Completions of deleted lessons never count.
    pub fn count_in(&self, tree: &CatalogTree) -> usize {
        tree.lessons()
            .iter()
            .filter(|lesson| self.contains(lesson.id))
            .count()
    }

    /// Drops completions whose lesson is no longer part of `tree`.
    pub fn restricted_to(&self, tree: &CatalogTree) -> CompletionSet {
        CompletionSet {
            completed: self
                .completed
                .iter()
                .filter(|(id, _)| tree.contains_lesson(**id))
                .map(|(id, at)| (*id, *at))
                .collect(),
        }
    }
}

impl FromIterator<(LessonId, Timestamp)> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = (LessonId, Timestamp)>>(iter: I) -> Self {
        let mut set = CompletionSet::new();
        for (lesson_id, at) in iter {
            set.insert(lesson_id, at);
        }
        set
    }
}

impl FromIterator<LessonId> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = LessonId>>(iter: I) -> Self {
        let now = Timestamp::now();
        iter.into_iter().map(|id| (id, now)).collect()
    }
}
