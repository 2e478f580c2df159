//! Snapshot of what a learner's course player should show.

use serde::{Deserialize, Serialize};

use super::{ProgressionView, ViewMode};
use crate::domain::catalog::CatalogTree;
use crate::domain::completion::CompletionSet;
use crate::domain::foundation::{LessonId, ModuleId};

/// Current selection, its neighbours and the visible outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub mode: ViewMode,
    pub current_module_id: Option<ModuleId>,
    pub current_lesson_id: Option<LessonId>,
    pub previous_lesson_id: Option<LessonId>,
    pub next_lesson_id: Option<LessonId>,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub visible_modules: Vec<NavigationModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationModule {
    pub module_id: ModuleId,
    pub title: String,
    pub lessons: Vec<NavigationLesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLesson {
    pub lesson_id: LessonId,
    pub title: String,
    pub is_free: bool,
    pub duration_minutes: Option<u32>,
    pub completed: bool,
}

impl NavigationState {
    /// Resolves the player state for `mode`.
    ///
    /// `requested` is the lesson the client had open (for example from the
    /// URL). It is kept when visible in `mode`; otherwise the initial lesson
    /// for the mode is selected. The same inputs always give the same state.
    pub fn resolve(
        tree: &CatalogTree,
        completions: &CompletionSet,
        mode: ViewMode,
        requested: Option<LessonId>,
    ) -> Self {
        let view = ProgressionView::new(tree, completions, mode);
        let current = view.resolve_selection(requested);
        let adjacency = current
            .map(|lesson| view.adjacency(lesson.module_id, lesson.id))
            .unwrap_or_default();

        let visible_modules = view
            .visible_modules()
            .into_iter()
            .map(|vm| NavigationModule {
                module_id: vm.module.id,
                title: vm.module.title.clone(),
                lessons: vm
                    .lessons
                    .into_iter()
                    .map(|lesson| NavigationLesson {
                        lesson_id: lesson.id,
                        title: lesson.title.clone(),
                        is_free: lesson.is_free,
                        duration_minutes: lesson.duration_minutes,
                        completed: completions.contains(lesson.id),
                    })
                    .collect(),
            })
            .collect();

        Self {
            mode,
            current_module_id: current.map(|l| l.module_id),
            current_lesson_id: current.map(|l| l.id),
            previous_lesson_id: adjacency.previous,
            next_lesson_id: adjacency.next,
            can_go_prev: adjacency.can_go_prev(),
            can_go_next: adjacency.can_go_next(),
            visible_modules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::two_module_course;

    #[test]
    fn fresh_learner_starts_at_first_lesson() {
        let c = two_module_course();
        let state = NavigationState::resolve(&c.tree, &CompletionSet::new(), ViewMode::All, None);

        assert_eq!(state.current_module_id, Some(c.m1));
        assert_eq!(state.current_lesson_id, Some(c.l1));
        assert_eq!(state.next_lesson_id, Some(c.l2));
        assert!(!state.can_go_prev);
        assert!(state.can_go_next);
        assert_eq!(state.visible_modules.len(), 2);
    }

    #[test]
    fn review_mode_lists_only_finished_lessons() {
        let c = two_module_course();
        let completions: CompletionSet = vec![c.l1, c.l2].into_iter().collect();

        let state =
            NavigationState::resolve(&c.tree, &completions, ViewMode::CompletedOnly, Some(c.l2));

        assert_eq!(state.current_lesson_id, Some(c.l2));
        assert_eq!(state.previous_lesson_id, Some(c.l1));
        assert!(!state.can_go_next);
        assert_eq!(state.visible_modules.len(), 1);
        assert!(state.visible_modules[0].lessons.iter().all(|l| l.completed));
    }

    #[test]
    fn same_inputs_reproduce_the_same_state() {
        let c = two_module_course();
        let completions: CompletionSet = vec![c.l2].into_iter().collect();

        let mode = ViewMode::CompletedOnly;
        let first = NavigationState::resolve(&c.tree, &completions, mode, None);
        let reloaded = NavigationState::resolve(&c.tree, &completions, mode, None);

        assert_eq!(first, reloaded);
        assert_eq!(first.current_lesson_id, Some(c.l2));
    }

    #[test]
    fn review_mode_without_completions_is_empty() {
        let c = two_module_course();
        let state = NavigationState::resolve(
            &c.tree,
            &CompletionSet::new(),
            ViewMode::CompletedOnly,
            Some(c.l1),
        );

        assert_eq!(state.current_lesson_id, None);
        assert!(!state.can_go_prev && !state.can_go_next);
        assert!(state.visible_modules.is_empty());
    }
}
