//! Course model

use serde::{Deserialize, Serialize};

/// A course declared in the curriculum map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique short code (e.g., "MAT101")
    pub code: String,

    /// Display name (e.g., "Cálculo I")
    pub name: String,

    /// Prerequisite course codes, in declaration order
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Semester column the course is drawn in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,

    /// Credit value (can be fractional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f32>,
}

impl Course {
    /// Create a new course with no prerequisites
    ///
    /// # Arguments
    /// * `code` - Unique course code
    /// * `name` - Display name
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            prerequisites: Vec::new(),
            semester: None,
            credits: None,
        }
    }

    /// Builder-style prerequisite list
    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prereq in prerequisites {
            self.add_prerequisite(prereq.into());
        }
        self
    }

    /// Builder-style semester
    #[must_use]
    pub fn in_semester(mut self, semester: u32) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Builder-style credits
    #[must_use]
    pub fn with_credits(mut self, credits: f32) -> Self {
        self.credits = Some(credits);
        self
    }

    /// Add a prerequisite by course code
    pub fn add_prerequisite(&mut self, prereq_code: String) {
        if !self.prerequisites.contains(&prereq_code) {
            self.prerequisites.push(prereq_code);
        }
    }

    /// Whether `code` is one of this course's prerequisites
    #[must_use]
    pub fn requires(&self, code: &str) -> bool {
        self.prerequisites.iter().any(|p| p == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let course = Course::new("MAT101", "Cálculo I");

        assert_eq!(course.code, "MAT101");
        assert_eq!(course.name, "Cálculo I");
        assert!(course.prerequisites.is_empty());
        assert!(course.semester.is_none());
        assert!(course.credits.is_none());
    }

    #[test]
    fn test_add_prerequisite() {
        let mut course = Course::new("MAT102", "Cálculo II");

        course.add_prerequisite("MAT101".to_string());
        assert_eq!(course.prerequisites, vec!["MAT101"]);

        // Adding duplicate should not duplicate
        course.add_prerequisite("MAT101".to_string());
        assert_eq!(course.prerequisites.len(), 1);
    }

    #[test]
    fn test_builders_keep_order() {
        let course = Course::new("FIS102", "Física II")
            .with_prerequisites(["FIS101", "MAT102", "FIS101"])
            .in_semester(3)
            .with_credits(5.5);

        assert_eq!(course.prerequisites, vec!["FIS101", "MAT102"]);
        assert_eq!(course.semester, Some(3));
        assert!((course.credits.unwrap_or_default() - 5.5).abs() < f32::EPSILON);
        assert!(course.requires("MAT102"));
        assert!(!course.requires("MAT101"));
    }
}
