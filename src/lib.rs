//! Course Engine - Lesson progression for the learning portal
//!
//! Decides which lesson a learner sees next, tracks course progress from
//! lesson completions, and gates certificate issuance on course completion.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
