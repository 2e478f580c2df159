//! Lesson selection and cross-module navigation.
//!
//! A `ProgressionView` flattens the lessons visible under one mode into a
//! single ordered index. Neighbour lookups are then offsets into that index,
//! and the answer to "can I go forward?" comes from the same lookup that
//! produced the neighbour.

use serde::{Deserialize, Serialize};

use super::ViewMode;
use crate::domain::catalog::{CatalogTree, Lesson, Module, TreeModule};
use crate::domain::completion::CompletionSet;
use crate::domain::foundation::{LessonId, ModuleId};

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

/// Both neighbours of the current lesson, computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjacency {
    pub previous: Option<LessonId>,
    pub next: Option<LessonId>,
}

impl Adjacency {
    pub fn get(&self, direction: Direction) -> Option<LessonId> {
        match direction {
            Direction::Next => self.next,
            Direction::Previous => self.previous,
        }
    }

    pub fn can_advance(&self, direction: Direction) -> bool {
        self.get(direction).is_some()
    }

    pub fn can_go_prev(&self) -> bool {
        self.can_advance(Direction::Previous)
    }

    pub fn can_go_next(&self) -> bool {
        self.can_advance(Direction::Next)
    }
}

/// A module together with the lessons visible in the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleModule<'a> {
    pub ordinal: usize,
    pub module: &'a Module,
    pub lessons: Vec<&'a Lesson>,
}

#[derive(Debug, Clone, Copy)]
struct VisibleSlot {
    position: usize,
    module_ordinal: usize,
}

/// The lessons of a tree that are navigable under one mode.
#[derive(Debug, Clone)]
pub struct ProgressionView<'a> {
    tree: &'a CatalogTree,
    mode: ViewMode,
    /// Visible lessons in navigation order.
    visible: Vec<VisibleSlot>,
    /// Rank in `visible` for each tree position, `None` when hidden.
    rank: Vec<Option<usize>>,
    first_incomplete: Option<usize>,
}

impl<'a> ProgressionView<'a> {
    pub fn new(tree: &'a CatalogTree, completions: &CompletionSet, mode: ViewMode) -> Self {
        let mut visible = Vec::new();
        let mut rank = Vec::with_capacity(tree.total_lessons());
        let mut first_incomplete = None;

        for (position, lesson) in tree.lessons().iter().enumerate() {
            let done = completions.contains(lesson.id);
            if !done && first_incomplete.is_none() {
                first_incomplete = Some(position);
            }

            let shown = match mode {
                ViewMode::All => true,
                ViewMode::CompletedOnly => done,
            };
            match (shown, tree.module_ordinal_at(position)) {
                (true, Some(module_ordinal)) => {
                    rank.push(Some(visible.len()));
                    visible.push(VisibleSlot {
                        position,
                        module_ordinal,
                    });
                }
                _ => rank.push(None),
            }
        }

        Self {
            tree,
            mode,
            visible,
            rank,
            first_incomplete,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn tree(&self) -> &'a CatalogTree {
        self.tree
    }

    /// Number of navigable lessons.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn is_visible(&self, lesson_id: LessonId) -> bool {
        self.rank_of(lesson_id).is_some()
    }

    /// The lesson a learner lands on when opening the course.
    ///
    /// `All` resumes at the first unfinished lesson and falls back to the
    /// very first lesson once everything is done. `CompletedOnly` starts at
    /// the first finished lesson and has nothing to show without one.
    pub fn initial_lesson(&self) -> Option<&'a Lesson> {
        let position = match self.mode {
            ViewMode::All => self.first_incomplete.or(if self.tree.is_empty() {
                None
            } else {
                Some(0)
            }),
            ViewMode::CompletedOnly => self.visible.first().map(|slot| slot.position),
        };
        position.and_then(|p| self.tree.lesson_at(p))
    }

    /// Lessons of `module` visible in this mode, in module order.
    pub fn visible_lessons(&self, module: TreeModule<'a>) -> Vec<&'a Lesson> {
        module
            .lessons
            .iter()
            .filter(|lesson| self.is_visible(lesson.id))
            .collect()
    }

    /// Modules to render for this mode.
    ///
    /// The review view leaves out modules with nothing completed instead of
    /// rendering them as empty sections.
    pub fn visible_modules(&self) -> Vec<VisibleModule<'a>> {
        self.tree
            .modules()
            .map(|m| VisibleModule {
                ordinal: m.ordinal,
                module: m.module,
                lessons: self.visible_lessons(m),
            })
            .filter(|vm| self.mode == ViewMode::All || !vm.lessons.is_empty())
            .collect()
    }

    /// Neighbour of `current_lesson` in `direction`, crossing module
    /// boundaries. `None` at either end of the course; there is no
    /// wraparound.
    ///
    /// When `current_lesson` is not visible inside `current_module` (for
    /// instance after a mode switch hid it) the search starts from the
    /// module boundary instead. An unknown module has no neighbours.
    pub fn adjacent(
        &self,
        current_module: ModuleId,
        current_lesson: LessonId,
        direction: Direction,
    ) -> Option<&'a Lesson> {
        let module_ordinal = self.tree.module_ordinal(current_module)?;

        let rank = self
            .tree
            .position_of(current_lesson)
            .filter(|&p| self.tree.module_ordinal_at(p) == Some(module_ordinal))
            .and_then(|p| self.rank.get(p).copied().flatten());

        let target = match (rank, direction) {
            (Some(rank), Direction::Next) => rank.checked_add(1),
            (Some(rank), Direction::Previous) => rank.checked_sub(1),
            (None, Direction::Next) => Some(
                self.visible
                    .partition_point(|slot| slot.module_ordinal <= module_ordinal),
            ),
            (None, Direction::Previous) => self
                .visible
                .partition_point(|slot| slot.module_ordinal < module_ordinal)
                .checked_sub(1),
        }?;

        self.visible
            .get(target)
            .and_then(|slot| self.tree.lesson_at(slot.position))
    }

    /// Both neighbours in one go, for callers that render prev/next controls.
    pub fn adjacency(&self, current_module: ModuleId, current_lesson: LessonId) -> Adjacency {
        Adjacency {
            previous: self
                .adjacent(current_module, current_lesson, Direction::Previous)
                .map(|l| l.id),
            next: self
                .adjacent(current_module, current_lesson, Direction::Next)
                .map(|l| l.id),
        }
    }

    /// Keeps `requested` when it is visible in this mode, otherwise picks
    /// the initial lesson for the mode.
    pub fn resolve_selection(&self, requested: Option<LessonId>) -> Option<&'a Lesson> {
        requested
            .filter(|&id| self.is_visible(id))
            .and_then(|id| self.tree.lesson(id))
            .or_else(|| self.initial_lesson())
    }

    fn rank_of(&self, lesson_id: LessonId) -> Option<usize> {
        self.tree
            .position_of(lesson_id)
            .and_then(|p| self.rank.get(p).copied().flatten())
    }
}

/// First lesson to open for `mode`. See [`ProgressionView::initial_lesson`].
pub fn select_initial_lesson<'a>(
    tree: &'a CatalogTree,
    completions: &CompletionSet,
    mode: ViewMode,
) -> Option<&'a Lesson> {
    ProgressionView::new(tree, completions, mode).initial_lesson()
}

/// Lessons of one module visible under `mode`, in module order.
pub fn visible_lessons<'a>(
    module: TreeModule<'a>,
    completions: &CompletionSet,
    mode: ViewMode,
) -> Vec<&'a Lesson> {
    module
        .lessons
        .iter()
        .filter(|lesson| mode == ViewMode::All || completions.contains(lesson.id))
        .collect()
}

/// Modules to render under `mode`. See [`ProgressionView::visible_modules`].
pub fn visible_modules<'a>(
    tree: &'a CatalogTree,
    completions: &CompletionSet,
    mode: ViewMode,
) -> Vec<VisibleModule<'a>> {
    ProgressionView::new(tree, completions, mode).visible_modules()
}

/// Neighbouring lesson under `mode`. See [`ProgressionView::adjacent`].
pub fn adjacent<'a>(
    tree: &'a CatalogTree,
    completions: &CompletionSet,
    mode: ViewMode,
    current_module: ModuleId,
    current_lesson: LessonId,
    direction: Direction,
) -> Option<&'a Lesson> {
    ProgressionView::new(tree, completions, mode).adjacent(
        current_module,
        current_lesson,
        direction,
    )
}

/// Whether a navigation control should be enabled, from a cached lookup.
pub fn can_advance(adjacency: &Adjacency, direction: Direction) -> bool {
    adjacency.can_advance(direction)
}

/// Re-validates a selection after a mode switch.
pub fn resolve_selection<'a>(
    tree: &'a CatalogTree,
    completions: &CompletionSet,
    mode: ViewMode,
    requested: Option<LessonId>,
) -> Option<&'a Lesson> {
    ProgressionView::new(tree, completions, mode).resolve_selection(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::{course, two_module_course};
    use crate::domain::foundation::CourseId;

    fn id(lesson: Option<&Lesson>) -> Option<LessonId> {
        lesson.map(|l| l.id)
    }

    fn done(ids: &[LessonId]) -> CompletionSet {
        ids.iter().copied().collect()
    }

    // ───────────────────────────────────────────────────────────────
    // Initial selection
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn all_mode_starts_at_first_lesson_without_completions() {
        let c = two_module_course();
        let initial = select_initial_lesson(&c.tree, &CompletionSet::new(), ViewMode::All);
        assert_eq!(id(initial), Some(c.l1));
    }

    #[test]
    fn all_mode_resumes_at_first_unfinished_lesson() {
        let c = two_module_course();
        let initial = select_initial_lesson(&c.tree, &done(&[c.l1, c.l3]), ViewMode::All);
        assert_eq!(id(initial), Some(c.l2));
    }

    #[test]
    fn all_mode_falls_back_to_start_when_everything_is_done() {
        let c = two_module_course();
        let initial = select_initial_lesson(&c.tree, &done(&[c.l1, c.l2, c.l3]), ViewMode::All);
        assert_eq!(id(initial), Some(c.l1));
    }

    #[test]
    fn completed_mode_starts_at_first_finished_lesson() {
        let c = two_module_course();
        let initial = select_initial_lesson(&c.tree, &done(&[c.l3, c.l2]), ViewMode::CompletedOnly);
        assert_eq!(id(initial), Some(c.l2));
    }

    #[test]
    fn completed_mode_has_nothing_without_completions() {
        let c = two_module_course();
        let selected =
            select_initial_lesson(&c.tree, &CompletionSet::new(), ViewMode::CompletedOnly);
        assert!(selected.is_none());
    }

    #[test]
    fn empty_course_has_no_initial_lesson() {
        let tree = CatalogTree::build(course(CourseId::new()), vec![], vec![]);
        assert!(select_initial_lesson(&tree, &CompletionSet::new(), ViewMode::All).is_none());
    }

    // ───────────────────────────────────────────────────────────────
    // Navigation
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn next_walks_across_module_boundary_and_stops_at_end() {
        let c = two_module_course();
        let none = CompletionSet::new();
        let next = |m, l| id(adjacent(&c.tree, &none, ViewMode::All, m, l, Direction::Next));

        assert_eq!(next(c.m1, c.l1), Some(c.l2));
        assert_eq!(next(c.m1, c.l2), Some(c.l3));
        assert_eq!(next(c.m2, c.l3), None);
    }

    #[test]
    fn previous_walks_back_and_stops_at_start() {
        let c = two_module_course();
        let none = CompletionSet::new();
        let prev = |m, l| id(adjacent(&c.tree, &none, ViewMode::All, m, l, Direction::Previous));

        assert_eq!(prev(c.m2, c.l3), Some(c.l2));
        assert_eq!(prev(c.m1, c.l2), Some(c.l1));
        assert_eq!(prev(c.m1, c.l1), None);
    }

    #[test]
    fn review_view_hides_unfinished_module_and_stops_early() {
        let c = two_module_course();
        let completions = done(&[c.l1, c.l2]);
        let view = ProgressionView::new(&c.tree, &completions, ViewMode::CompletedOnly);

        assert_eq!(id(view.initial_lesson()), Some(c.l1));
        let modules: Vec<ModuleId> = view.visible_modules().iter().map(|m| m.module.id).collect();
        assert_eq!(modules, vec![c.m1]);
        assert_eq!(id(view.adjacent(c.m1, c.l2, Direction::Next)), None);
    }

    #[test]
    fn hidden_current_lesson_falls_through_to_neighbouring_modules() {
        let c = two_module_course();
        // Only L1 and L3 are complete; L2 is hidden in review mode.
        let completions = done(&[c.l1, c.l3]);
        let view = ProgressionView::new(&c.tree, &completions, ViewMode::CompletedOnly);

        assert_eq!(id(view.adjacent(c.m1, c.l2, Direction::Next)), Some(c.l3));
        assert_eq!(id(view.adjacent(c.m1, c.l2, Direction::Previous)), None);
        assert_eq!(id(view.adjacent(c.m2, c.l2, Direction::Previous)), Some(c.l1));
    }

    #[test]
    fn lesson_claimed_under_wrong_module_uses_module_boundary() {
        let c = two_module_course();
        let none = CompletionSet::new();
        let view = ProgressionView::new(&c.tree, &none, ViewMode::All);

        // L1 does not live in M2, so "next" starts after M2.
        assert_eq!(id(view.adjacent(c.m2, c.l1, Direction::Next)), None);
        assert_eq!(id(view.adjacent(c.m2, c.l1, Direction::Previous)), Some(c.l2));
    }

    #[test]
    fn unknown_module_has_no_neighbours() {
        let c = two_module_course();
        let view = ProgressionView::new(&c.tree, &CompletionSet::new(), ViewMode::All);
        assert_eq!(view.adjacency(ModuleId::new(), c.l1), Adjacency::default());
    }

    #[test]
    fn adjacency_drives_navigation_controls() {
        let c = two_module_course();
        let view = ProgressionView::new(&c.tree, &CompletionSet::new(), ViewMode::All);

        let first = view.adjacency(c.m1, c.l1);
        assert!(!first.can_go_prev());
        assert!(can_advance(&first, Direction::Next));

        let last = view.adjacency(c.m2, c.l3);
        assert!(last.can_go_prev());
        assert!(!last.can_go_next());
    }

    // ───────────────────────────────────────────────────────────────
    // Visibility and mode switches
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn visible_lessons_filters_by_mode() {
        let c = two_module_course();
        let completions = done(&[c.l2]);
        let m1 = c.tree.module(c.m1).unwrap();

        let all: Vec<LessonId> = visible_lessons(m1, &completions, ViewMode::All)
            .iter()
            .map(|l| l.id)
            .collect();
        let review: Vec<LessonId> = visible_lessons(m1, &completions, ViewMode::CompletedOnly)
            .iter()
            .map(|l| l.id)
            .collect();

        assert_eq!(all, vec![c.l1, c.l2]);
        assert_eq!(review, vec![c.l2]);
    }

    #[test]
    fn all_mode_keeps_modules_without_lessons() {
        let course_id = CourseId::new();
        let empty = Module::new(ModuleId::new(), course_id, "soon", 1);
        let tree = CatalogTree::build(course(course_id), vec![empty.clone()], vec![]);

        assert_eq!(visible_modules(&tree, &CompletionSet::new(), ViewMode::All).len(), 1);
        assert!(visible_modules(&tree, &CompletionSet::new(), ViewMode::CompletedOnly).is_empty());
    }

    #[test]
    fn mode_switch_keeps_selection_that_is_still_visible() {
        let c = two_module_course();
        let completions = done(&[c.l1, c.l2]);
        let selected =
            resolve_selection(&c.tree, &completions, ViewMode::CompletedOnly, Some(c.l2));
        assert_eq!(id(selected), Some(c.l2));
    }

    #[test]
    fn mode_switch_reselects_when_lesson_becomes_hidden() {
        let c = two_module_course();
        let completions = done(&[c.l2]);
        let selected =
            resolve_selection(&c.tree, &completions, ViewMode::CompletedOnly, Some(c.l3));
        assert_eq!(id(selected), Some(c.l2));
    }

    #[test]
    fn unknown_selection_falls_back_to_initial() {
        let c = two_module_course();
        let selected = resolve_selection(
            &c.tree,
            &CompletionSet::new(),
            ViewMode::All,
            Some(LessonId::new()),
        );
        assert_eq!(id(selected), Some(c.l1));
    }
}
