//! Course, module and lesson entities as supplied by the content subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CourseId, LessonId, ModuleId, ValidationError};

/// URL slug of a course. Globally unique and never changed after publish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseSlug(String);

impl CourseSlug {
    /// Creates a slug of lowercase ASCII letters, digits and single hyphens.
    pub fn new(slug: impl Into<String>) -> Result<Self, ValidationError> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(ValidationError::empty_field("slug"));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::invalid_format(
                "slug",
                "only lowercase letters, digits and hyphens are allowed",
            ));
        }
        if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
            return Err(ValidationError::invalid_format(
                "slug",
                "hyphens must separate words",
            ));
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CourseSlug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourseSlug> for String {
    fn from(slug: CourseSlug) -> Self {
        slug.0
    }
}

impl fmt::Display for CourseSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course as seen by the progression engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub slug: CourseSlug,
}

impl Course {
    pub fn new(id: CourseId, title: impl Into<String>, slug: CourseSlug) -> Self {
        Self {
            id,
            title: title.into(),
            slug,
        }
    }
}

/// A module groups lessons inside a course.
///
/// `order_index` is a sort key only; gaps are allowed and ties fall back
/// to creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub course_id: CourseId,
    pub title: String,
    pub order_index: i32,
}

impl Module {
    pub fn new(
        id: ModuleId,
        course_id: CourseId,
        title: impl Into<String>,
        order_index: i32,
    ) -> Self {
        Self {
            id,
            course_id,
            title: title.into(),
            order_index,
        }
    }
}

/// A single consumable lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub module_id: ModuleId,
    pub title: String,
    pub order_index: i32,
    pub is_free: bool,
    /// Length in minutes, when the author provided one.
    pub duration_minutes: Option<u32>,
}

impl Lesson {
    pub fn new(
        id: LessonId,
        module_id: ModuleId,
        title: impl Into<String>,
        order_index: i32,
    ) -> Self {
        Self {
            id,
            module_id,
            title: title.into(),
            order_index,
            is_free: false,
            duration_minutes: None,
        }
    }

    pub fn free(mut self) -> Self {
        self.is_free = true;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// Where a lesson lives in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonLocation {
    pub course_id: CourseId,
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
}
