use serde::{Deserialize, Serialize};

/// Identifier assigned to a course when it is created.
pub type CourseId = i64;

/// A single course record as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

impl Course {
    pub fn new<S: Into<String>>(id: CourseId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Records present in every freshly started collection.
    pub fn seed() -> Vec<Course> {
        (1..=3)
            .map(|id| Course::new(id, format!("course {id}")))
            .collect()
    }
}
