//! Ordered snapshot of a course's modules and lessons.
//!
//! Lessons are stored in a single arena laid out in navigation order
//! (module order, then lesson order within the module). Each module owns a
//! contiguous range of that arena, so "the lesson after this one" is an
//! offset lookup instead of a nested scan.

use std::collections::HashMap;
use std::ops::Range;

use super::{Course, Lesson, Module};
use crate::domain::foundation::{CourseId, LessonId, ModuleId};

/// Immutable, totally ordered view of one course.
#[derive(Debug, Clone)]
pub struct CatalogTree {
    course: Course,
    modules: Vec<ModuleSlot>,
    /// Lessons in navigation order.
    lessons: Vec<Lesson>,
    /// Module ordinal for each arena position.
    lesson_module: Vec<usize>,
    positions: HashMap<LessonId, usize>,
    module_ordinals: HashMap<ModuleId, usize>,
}

#[derive(Debug, Clone)]
struct ModuleSlot {
    module: Module,
    lessons: Range<usize>,
}

/// Borrowed view of one module and its ordered lessons.
#[derive(Debug, Clone, Copy)]
pub struct TreeModule<'a> {
    /// Position of the module within the course.
    pub ordinal: usize,
    pub module: &'a Module,
    pub lessons: &'a [Lesson],
}

impl CatalogTree {
    /// Builds the tree from unordered parts.
    ///
    /// `modules` and `lessons` are expected in creation order; they are
    /// stable-sorted by `order_index`, so equal indices keep that order.
    /// Modules of another course and lessons whose module is not part of
    /// the course are dropped.
    pub fn build(course: Course, modules: Vec<Module>, lessons: Vec<Lesson>) -> Self {
        let mut modules: Vec<Module> = modules
            .into_iter()
            .filter(|m| m.course_id == course.id)
            .collect();
        modules.sort_by_key(|m| m.order_index);

        let module_ordinals: HashMap<ModuleId, usize> = modules
            .iter()
            .enumerate()
            .map(|(ordinal, m)| (m.id, ordinal))
            .collect();

        let mut grouped: Vec<Vec<Lesson>> = vec![Vec::new(); modules.len()];
        for lesson in lessons {
            if let Some(&ordinal) = module_ordinals.get(&lesson.module_id) {
                grouped[ordinal].push(lesson);
            }
        }

        let mut arena = Vec::new();
        let mut lesson_module = Vec::new();
        let mut slots = Vec::with_capacity(modules.len());
        for (ordinal, (module, mut group)) in modules.into_iter().zip(grouped).enumerate() {
            group.sort_by_key(|l| l.order_index);
            let start = arena.len();
            lesson_module.extend(std::iter::repeat(ordinal).take(group.len()));
            arena.extend(group);
            slots.push(ModuleSlot {
                module,
                lessons: start..arena.len(),
            });
        }

        let positions = arena
            .iter()
            .enumerate()
            .map(|(position, l)| (l.id, position))
            .collect();

        Self {
            course,
            modules: slots,
            lessons: arena,
            lesson_module,
            positions,
            module_ordinals,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn course_id(&self) -> CourseId {
        self.course.id
    }

    /// True when the course has no lessons at all.
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }

    /// Modules in course order.
    pub fn modules(&self) -> impl Iterator<Item = TreeModule<'_>> + '_ {
        (0..self.modules.len()).map(move |ordinal| self.module_at(ordinal))
    }

    pub fn module(&self, id: ModuleId) -> Option<TreeModule<'_>> {
        self.module_ordinals
            .get(&id)
            .map(|&ordinal| self.module_at(ordinal))
    }

    pub fn module_ordinal(&self, id: ModuleId) -> Option<usize> {
        self.module_ordinals.get(&id).copied()
    }

    /// Every lesson in navigation order.
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.position_of(id).map(|p| &self.lessons[p])
    }

    pub fn contains_lesson(&self, id: LessonId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Position of a lesson in navigation order.
    pub fn position_of(&self, id: LessonId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Lesson at a navigation position.
    pub fn lesson_at(&self, position: usize) -> Option<&Lesson> {
        self.lessons.get(position)
    }

    /// Module ordinal owning the lesson at `position`.
    pub fn module_ordinal_at(&self, position: usize) -> Option<usize> {
        self.lesson_module.get(position).copied()
    }

    fn module_at(&self, ordinal: usize) -> TreeModule<'_> {
        let slot = &self.modules[ordinal];
        TreeModule {
            ordinal,
            module: &slot.module,
            lessons: &self.lessons[slot.lessons.clone()],
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small trees shared by the domain tests.

    use super::*;
    use crate::domain::catalog::CourseSlug;

    pub struct SampleCourse {
        pub tree: CatalogTree,
        pub m1: ModuleId,
        pub m2: ModuleId,
        pub l1: LessonId,
        pub l2: LessonId,
        pub l3: LessonId,
    }

    pub fn course(id: CourseId) -> Course {
        Course::new(id, "Managing Stress", CourseSlug::new("managing-stress").unwrap())
    }

    /// M1: L1, L2; M2: L3.
    pub fn two_module_course() -> SampleCourse {
        let course_id = CourseId::new();
        let m1 = Module::new(ModuleId::new(), course_id, "Foundations", 1);
        let m2 = Module::new(ModuleId::new(), course_id, "Practice", 2);
        let l1 = Lesson::new(LessonId::new(), m1.id, "What is stress", 1).free();
        let l2 = Lesson::new(LessonId::new(), m1.id, "Body signals", 2);
        let l3 = Lesson::new(LessonId::new(), m2.id, "Breathing", 1).with_duration(15);

        SampleCourse {
            m1: m1.id,
            m2: m2.id,
            l1: l1.id,
            l2: l2.id,
            l3: l3.id,
            tree: CatalogTree::build(
                course(course_id),
                vec![m2, m1],
                vec![l3, l2, l1],
            ),
        }
    }
}
