//! Catalog module - Course content structure.
//!
//! A `CatalogTree` is an immutable snapshot of one course's modules and
//! lessons, taken once per request and handed to the progression resolver.

mod course;
mod tree;

pub use course::{Course, CourseSlug, Lesson, LessonLocation, Module};
pub use tree::{CatalogTree, TreeModule};

#[cfg(test)]
pub(crate) use tree::fixtures;
