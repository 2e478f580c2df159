//! Course progress derived from the current tree.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogTree;
use crate::domain::completion::CompletionSet;
use crate::domain::foundation::Percentage;

/// Progress of one learner through one course.
///
/// Both counts are taken against the tree as it is now: completions of
/// deleted lessons are ignored, and lessons added later enlarge the
/// denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub percent: Percentage,
    pub completed: bool,
}

impl CourseProgress {
    pub fn compute(tree: &CatalogTree, completions: &CompletionSet) -> Self {
        let total_lessons = tree.total_lessons();
        let completed_lessons = completions.count_in(tree);

        Self {
            total_lessons,
            completed_lessons,
            percent: Percentage::from_ratio(completed_lessons, total_lessons),
            completed: total_lessons > 0 && completed_lessons >= total_lessons,
        }
    }
}
