//! Curriculum model: the static course declarations of a map

use super::Course;
use crate::error::{MallaError, Result};
use crate::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A curriculum map loaded once at startup and never mutated afterwards
#[derive(Debug, Clone)]
pub struct Curriculum {
    /// Curriculum name (e.g., "Ingeniería Civil")
    pub name: String,

    /// Institution offering the curriculum
    pub institution: Option<String>,

    /// Courses in declaration order
    courses: Vec<Course>,

    /// Maps course code -> position in `courses`
    index: HashMap<String, usize>,
}

/// On-disk shape of a curriculum file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurriculumFile {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    institution: Option<String>,
    #[serde(default)]
    courses: Vec<Course>,
}

impl Curriculum {
    /// Create an empty curriculum
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            institution: None,
            courses: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a course
    ///
    /// # Errors
    /// Returns [`MallaError::DuplicateCourse`] if a course with the same code exists
    pub fn add_course(&mut self, course: Course) -> Result<()> {
        if self.index.contains_key(&course.code) {
            return Err(MallaError::DuplicateCourse { code: course.code });
        }
        self.index.insert(course.code.clone(), self.courses.len());
        self.courses.push(course);
        Ok(())
    }

    /// Parse a curriculum from a TOML string
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or two courses share a code
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Self::parse(toml_str, Path::new(""))
    }

    /// Load a curriculum from a TOML file
    ///
    /// Prerequisite codes that do not match any declared course are reported
    /// at warn level but are not an error.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MallaError::io(path, e))?;
        let curriculum = Self::parse(&content, path)?;
        for (course, missing) in curriculum.undeclared_prerequisites() {
            warn!(
                "{}: course {} requires undeclared course {missing}",
                path.display(),
                course.code
            );
        }
        Ok(curriculum)
    }

    fn parse(toml_str: &str, path: &Path) -> Result<Self> {
        let file: CurriculumFile =
            toml::from_str(toml_str).map_err(|e| MallaError::CurriculumParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let mut curriculum = Self::new(file.name);
        curriculum.institution = file.institution;
        for course in file.courses {
            curriculum.add_course(course)?;
        }
        Ok(curriculum)
    }

    /// Serialize back to TOML
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(&CurriculumFile {
            name: self.name.clone(),
            institution: self.institution.clone(),
            courses: self.courses.clone(),
        })
    }

    /// All courses in declaration order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course by code
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|&i| &self.courses[i])
    }

    /// Whether a course with this code is declared
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Display name for a code, falling back to the code itself when undeclared
    #[must_use]
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map_or(code, |c| c.name.as_str())
    }

    /// Number of declared courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether no course is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses that list `code` as a prerequisite
    pub fn dependents<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses.iter().filter(move |c| c.requires(code))
    }

    /// Pairs of (course, prerequisite code) where the prerequisite is not declared
    #[must_use]
    pub fn undeclared_prerequisites(&self) -> Vec<(&Course, &str)> {
        self.courses
            .iter()
            .flat_map(|course| {
                course
                    .prerequisites
                    .iter()
                    .filter(|p| !self.contains(p))
                    .map(move |p| (course, p.as_str()))
            })
            .collect()
    }

    /// Courses grouped by semester, ascending; courses without a semester come last
    #[must_use]
    pub fn by_semester(&self) -> Vec<(Option<u32>, Vec<&Course>)> {
        let mut groups: Vec<(Option<u32>, Vec<&Course>)> = Vec::new();
        for course in &self.courses {
            match groups.iter_mut().find(|(s, _)| *s == course.semester) {
                Some((_, list)) => list.push(course),
                None => groups.push((course.semester, vec![course])),
            }
        }
        groups.sort_by_key(|(semester, _)| semester.unwrap_or(u32::MAX));
        groups
    }
}

impl std::fmt::Display for Curriculum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({} courses):", self.name, self.courses.len())?;
        for course in &self.courses {
            if course.prerequisites.is_empty() {
                writeln!(f, "  {} → (no prerequisites)", course.code)?;
            } else {
                writeln!(f, "  {} → {}", course.code, course.prerequisites.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "Ingeniería Civil"
institution = "Universidad de Prueba"

[[courses]]
code = "MAT101"
name = "Cálculo I"
semester = 1

[[courses]]
code = "MAT102"
name = "Cálculo II"
semester = 2
prerequisites = ["MAT101"]

[[courses]]
code = "ELEC"
name = "Electivo"

[[courses]]
code = "FIS101"
name = "Física I"
semester = 1
credits = 6
prerequisites = ["MAT000"]
"#;

    #[test]
    fn test_from_toml() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        assert_eq!(curriculum.name, "Ingeniería Civil");
        assert_eq!(curriculum.institution.as_deref(), Some("Universidad de Prueba"));
        assert_eq!(curriculum.len(), 4);
        assert_eq!(curriculum.courses()[1].code, "MAT102");
        assert_eq!(curriculum.get("MAT102").unwrap().prerequisites, vec!["MAT101"]);
        assert!(curriculum.get("FIS101").unwrap().credits.is_some());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let toml_str = r#"
name = "Dup"
[[courses]]
code = "A"
name = "One"
[[courses]]
code = "A"
name = "Two"
"#;
        let err = Curriculum::from_toml(toml_str).unwrap_err();
        assert!(err.to_string().contains("Duplicate course code 'A'"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Curriculum::from_toml("name = ").unwrap_err();
        assert!(matches!(err, MallaError::CurriculumParse { .. }));
    }

    #[test]
    fn test_display_name_fallback() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        assert_eq!(curriculum.display_name("MAT101"), "Cálculo I");
        assert_eq!(curriculum.display_name("MAT000"), "MAT000");
    }

    #[test]
    fn test_undeclared_prerequisites() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        let missing = curriculum.undeclared_prerequisites();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0.code, "FIS101");
        assert_eq!(missing[0].1, "MAT000");
    }

    #[test]
    fn test_dependents() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        let deps: Vec<&str> = curriculum
            .dependents("MAT101")
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(deps, vec!["MAT102"]);
    }

    #[test]
    fn test_by_semester_orders_unassigned_last() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        let groups = curriculum.by_semester();
        let semesters: Vec<Option<u32>> = groups.iter().map(|(s, _)| *s).collect();
        assert_eq!(semesters, vec![Some(1), Some(2), None]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_toml_roundtrip_keeps_order() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        let again = Curriculum::from_toml(&curriculum.to_toml().unwrap()).unwrap();
        let codes: Vec<&str> = again.courses().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["MAT101", "MAT102", "ELEC", "FIS101"]);
    }

    #[test]
    fn test_display() {
        let curriculum = Curriculum::from_toml(SAMPLE).unwrap();
        let display = format!("{curriculum}");
        assert!(display.contains("Ingeniería Civil (4 courses)"));
        assert!(display.contains("MAT101 → (no prerequisites)"));
        assert!(display.contains("MAT102 → MAT101"));
    }
}
