//! Requirement overlay: the panel listing unmet prerequisites of a locked course

use super::models::{Course, Curriculum};
use super::store::CompletedSet;

/// An unmet prerequisite as shown in the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequirement {
    /// Prerequisite code
    pub code: String,
    /// Display name, or the raw code when no course declares it
    pub name: String,
    /// Whether a course with this code is declared
    pub declared: bool,
}

/// Where a click landed while the overlay is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayClick {
    /// The explicit close control
    CloseButton,
    /// Inside the panel, but not on the close control
    Inside,
    /// Outside the panel bounds
    Outside,
}

/// Overlay contents and visibility
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementOverlay {
    /// Code of the course the overlay was opened for
    pub course_code: String,
    /// Name of that course
    pub course_name: String,
    /// Unmet prerequisites in declaration order
    pub missing: Vec<MissingRequirement>,
    visible: bool,
}

impl RequirementOverlay {
    /// A hidden, empty overlay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the overlay for `course` and make it visible
    ///
    /// Previous contents are replaced.
    pub fn open(&mut self, course: &Course, curriculum: &Curriculum, completed: &CompletedSet) {
        self.course_code.clone_from(&course.code);
        self.course_name.clone_from(&course.name);
        self.missing = missing_requirements(course, curriculum, completed);
        self.visible = true;
    }

    /// Hide the overlay
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Apply a click while the overlay is shown. Returns `true` if it closed.
    pub fn click(&mut self, target: OverlayClick) -> bool {
        if !self.visible {
            return false;
        }
        match target {
            OverlayClick::CloseButton | OverlayClick::Outside => {
                self.close();
                true
            }
            OverlayClick::Inside => false,
        }
    }

    /// Whether the overlay is shown
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Names listed by the overlay, in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.missing.iter().map(|m| m.name.as_str()).collect()
    }
}

impl std::fmt::Display for RequirementOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Missing requirements for {} ({}):",
            self.course_name, self.course_code
        )?;
        if self.missing.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for requirement in &self.missing {
            if requirement.declared {
                writeln!(f, "  - {} ({})", requirement.name, requirement.code)?;
            } else {
                writeln!(f, "  - {}", requirement.name)?;
            }
        }
        Ok(())
    }
}

/// Prerequisites of `course` not yet in `completed`, resolved to display names
#[must_use]
pub fn missing_requirements(
    course: &Course,
    curriculum: &Curriculum,
    completed: &CompletedSet,
) -> Vec<MissingRequirement> {
    course
        .prerequisites
        .iter()
        .filter(|code| !completed.contains(*code))
        .map(|code| MissingRequirement {
            code: code.clone(),
            name: curriculum.display_name(code).to_string(),
            declared: curriculum.contains(code),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curriculum() -> Curriculum {
        let mut curriculum = Curriculum::new("Test");
        curriculum.add_course(Course::new("A", "Álgebra")).unwrap();
        curriculum.add_course(Course::new("B", "Biología")).unwrap();
        curriculum
            .add_course(Course::new("X", "Avanzado").with_prerequisites(["A", "B", "Z9"]))
            .unwrap();
        curriculum
    }

    #[test]
    fn test_open_lists_only_unmet_in_order() {
        let curriculum = curriculum();
        let completed: CompletedSet = ["B".to_string()].into_iter().collect();
        let mut overlay = RequirementOverlay::new();
        assert!(!overlay.is_visible());

        overlay.open(curriculum.get("X").unwrap(), &curriculum, &completed);
        assert!(overlay.is_visible());
        assert_eq!(overlay.course_code, "X");
        assert_eq!(overlay.names(), vec!["Álgebra", "Z9"]);
        assert!(overlay.missing[0].declared);
        assert!(!overlay.missing[1].declared);
    }

    #[test]
    fn test_dismissal_rules() {
        let curriculum = curriculum();
        let mut overlay = RequirementOverlay::new();
        overlay.open(
            curriculum.get("X").unwrap(),
            &curriculum,
            &CompletedSet::new(),
        );

        assert!(!overlay.click(OverlayClick::Inside));
        assert!(overlay.is_visible());

        assert!(overlay.click(OverlayClick::Outside));
        assert!(!overlay.is_visible());

        overlay.open(
            curriculum.get("X").unwrap(),
            &curriculum,
            &CompletedSet::new(),
        );
        assert!(overlay.click(OverlayClick::CloseButton));
        assert!(!overlay.is_visible());

        // Clicks on a hidden overlay do nothing
        assert!(!overlay.click(OverlayClick::Outside));
    }

    #[test]
    fn test_display_shows_raw_code_for_undeclared() {
        let curriculum = curriculum();
        let mut overlay = RequirementOverlay::new();
        overlay.open(
            curriculum.get("X").unwrap(),
            &curriculum,
            &CompletedSet::new(),
        );
        let text = overlay.to_string();
        assert!(text.contains("Missing requirements for Avanzado (X)"));
        assert!(text.contains("  - Álgebra (A)"));
        assert!(text.contains("  - Z9\n"));
    }
}
