//! Domain types and request validation for the course service.
//!
//! Nothing in this crate performs I/O; storage and HTTP concerns live in the
//! `course-storage` and `course-app` crates.

pub mod id;
pub mod schema;
pub mod types;

pub use id::parse_course_id;
pub use schema::{
    CourseInput, FieldRule, Schema, ValidationError, Violation, ViolationKind, COURSE_SCHEMA,
};
pub use types::{Course, CourseId};
