//! Progression module - Pure navigation and progress rules.
//!
//! Everything here is a function of (tree, completions, mode). Nothing is
//! persisted and nothing performs I/O, so results are safe to compute
//! repeatedly from any number of concurrent requests.

mod navigation;
mod progress;
mod resolver;
mod view_mode;

pub use navigation::{NavigationLesson, NavigationModule, NavigationState};
pub use progress::CourseProgress;
pub use resolver::{
    adjacent, can_advance, resolve_selection, select_initial_lesson, visible_lessons,
    visible_modules, Adjacency, Direction, ProgressionView, VisibleModule,
};
pub use view_mode::ViewMode;
