use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::debug;

use course_core::types::{Course, CourseId};

/// Storage backend for the course collection.
///
/// Every method is atomic with respect to the others. Implementations keep
/// insertion order, and lookups by id resolve to the first matching record.
pub trait CourseStore: Send + Sync {
    /// Returns every course in insertion order.
    fn list(&self) -> Vec<Course>;

    /// Returns the first course whose id equals `id`.
    fn find(&self, id: CourseId) -> Result<Course, CourseStoreError>;

    /// Appends a new course and returns it.
    ///
    /// The id is the collection length plus one, so a create that follows a
    /// delete can reuse an id that is still present.
    fn insert(&self, name: String) -> Course;

    /// Replaces the name of the first course matching `id`, in place.
    fn rename(&self, id: CourseId, name: String) -> Result<Course, CourseStoreError>;

    /// Removes the first course matching `id` and returns its prior contents.
    fn remove(&self, id: CourseId) -> Result<Course, CourseStoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors returned by [`CourseStore`] lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseStoreError {
    #[error("course {0} not found")]
    NotFound(CourseId),
}

/// Process-local course collection backed by a vector.
#[derive(Debug, Default)]
pub struct InMemoryCourseStore {
    courses: Mutex<Vec<Course>>,
}

impl InMemoryCourseStore {
    /// Creates a store holding the three seed courses.
    pub fn seeded() -> Self {
        Self::with_courses(Course::seed())
    }

    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Course>> {
        self.courses.lock().expect("course store poisoned")
    }
}

fn position(courses: &[Course], id: CourseId) -> Result<usize, CourseStoreError> {
    courses
        .iter()
        .position(|course| course.id == id)
        .ok_or(CourseStoreError::NotFound(id))
}

impl CourseStore for InMemoryCourseStore {
    fn list(&self) -> Vec<Course> {
        self.lock().clone()
    }

    fn find(&self, id: CourseId) -> Result<Course, CourseStoreError> {
        let courses = self.lock();
        let index = position(&courses, id)?;
        Ok(courses[index].clone())
    }

    fn insert(&self, name: String) -> Course {
        let mut courses = self.lock();
        let course = Course::new(courses.len() as CourseId + 1, name);
        courses.push(course.clone());
        debug!(stage = "storage", id = course.id, size = courses.len(), "course inserted");
        course
    }

    fn rename(&self, id: CourseId, name: String) -> Result<Course, CourseStoreError> {
        let mut courses = self.lock();
        let index = position(&courses, id)?;
        courses[index].name = name;
        Ok(courses[index].clone())
    }

    fn remove(&self, id: CourseId) -> Result<Course, CourseStoreError> {
        let mut courses = self.lock();
        let index = position(&courses, id)?;
        let removed = courses.remove(index);
        debug!(stage = "storage", id, size = courses.len(), "course removed");
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &InMemoryCourseStore) -> Vec<CourseId> {
        store.list().into_iter().map(|course| course.id).collect()
    }

    #[test]
    fn seeded_store_holds_three_courses() {
        let store = InMemoryCourseStore::seeded();
        assert_eq!(store.len(), 3);
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.find(2).expect("seeded"), Course::new(2, "course 2"));
    }

    #[test]
    fn find_errors_for_missing_id() {
        let store = InMemoryCourseStore::seeded();
        assert_eq!(store.find(99), Err(CourseStoreError::NotFound(99)));
    }

    #[test]
    fn insert_assigns_length_plus_one() {
        let store = InMemoryCourseStore::seeded();
        let course = store.insert("algorithms".to_string());
        assert_eq!(course, Course::new(4, "algorithms"));
        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
    }

    #[test]
    fn insert_after_remove_reuses_existing_id() {
        let store = InMemoryCourseStore::seeded();
        store.remove(1).expect("remove seeded");
        let course = store.insert("duplicate".to_string());
        assert_eq!(course.id, 3);
        assert_eq!(ids(&store), vec![2, 3, 3]);
        assert_eq!(store.find(3).expect("first match").name, "course 3");
    }

    #[test]
    fn rename_keeps_position() {
        let store = InMemoryCourseStore::seeded();
        let updated = store.rename(2, "new name".to_string()).expect("rename");
        assert_eq!(updated, Course::new(2, "new name"));
        assert_eq!(store.list()[1], updated);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn rename_errors_for_missing_id() {
        let store = InMemoryCourseStore::seeded();
        let err = store.rename(42, "whatever".to_string()).unwrap_err();
        assert_eq!(err, CourseStoreError::NotFound(42));
        assert_eq!(store.list(), Course::seed());
    }

    #[test]
    fn remove_takes_only_the_first_match() {
        let store = InMemoryCourseStore::with_courses(vec![
            Course::new(1, "same"),
            Course::new(1, "same"),
        ]);
        let removed = store.remove(1).expect("remove");
        assert_eq!(removed, Course::new(1, "same"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_store_reports_empty() {
        let store = InMemoryCourseStore::default();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }
}
