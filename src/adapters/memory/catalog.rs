//! In-Memory Catalog Adapter
//!
//! Holds courses, modules and lessons in insertion order, which stands in
//! for creation order when order indices tie.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{CatalogTree, Course, Lesson, LessonLocation, Module};
use crate::domain::foundation::{CourseId, DomainError, LessonId, ModuleId};
use crate::ports::CatalogReader;

#[derive(Debug, Default)]
struct CatalogData {
    courses: HashMap<CourseId, Course>,
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
}

/// In-memory course catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    data: Arc<RwLock<CatalogData>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog holding one course tree.
    pub async fn with_tree(tree: &CatalogTree) -> Self {
        let catalog = Self::new();
        catalog.add_course(tree.course().clone()).await;
        for module in tree.modules() {
            catalog.add_module(module.module.clone()).await;
            for lesson in module.lessons {
                catalog.add_lesson(lesson.clone()).await;
            }
        }
        catalog
    }

    pub async fn add_course(&self, course: Course) {
        self.data.write().await.courses.insert(course.id, course);
    }

    pub async fn add_module(&self, module: Module) {
        self.data.write().await.modules.push(module);
    }

    pub async fn add_lesson(&self, lesson: Lesson) {
        self.data.write().await.lessons.push(lesson);
    }

    /// Deletes a lesson. Completions that point at it become orphans.
    pub async fn remove_lesson(&self, lesson_id: LessonId) -> bool {
        let mut data = self.data.write().await;
        let before = data.lessons.len();
        data.lessons.retain(|l| l.id != lesson_id);
        data.lessons.len() != before
    }

    /// Deletes a module together with its lessons, as the cascade does in
    /// PostgreSQL. Completions of those lessons become orphans here.
    pub async fn remove_module(&self, module_id: ModuleId) -> bool {
        let mut data = self.data.write().await;
        let before = data.modules.len();
        data.modules.retain(|m| m.id != module_id);
        if data.modules.len() == before {
            return false;
        }
        data.lessons.retain(|l| l.module_id != module_id);
        true
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn load_tree(&self, course_id: &CourseId) -> Result<Option<CatalogTree>, DomainError> {
        let data = self.data.read().await;
        let Some(course) = data.courses.get(course_id) else {
            return Ok(None);
        };

        let modules: Vec<Module> = data
            .modules
            .iter()
            .filter(|m| m.course_id == *course_id)
            .cloned()
            .collect();
        let module_ids: Vec<ModuleId> = modules.iter().map(|m| m.id).collect();
        let lessons = data
            .lessons
            .iter()
            .filter(|l| module_ids.contains(&l.module_id))
            .cloned()
            .collect();

        Ok(Some(CatalogTree::build(course.clone(), modules, lessons)))
    }

    async fn find_lesson(
        &self,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonLocation>, DomainError> {
        let data = self.data.read().await;
        let location = data.lessons.iter().find(|l| l.id == *lesson_id).and_then(|lesson| {
            data.modules
                .iter()
                .find(|m| m.id == lesson.module_id)
                .map(|module| LessonLocation {
                    course_id: module.course_id,
                    module_id: module.id,
                    lesson_id: lesson.id,
                })
        });
        Ok(location)
    }
}
