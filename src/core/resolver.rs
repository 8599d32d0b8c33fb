//! Visual state resolution
//!
//! Every course is in exactly one of three states, derived from the
//! Completed-set and the static prerequisite lists:
//! - `Completed` if its own code is in the set (takes priority),
//! - `Available` if every prerequisite is in the set,
//! - `Locked` otherwise.
//!
//! Resolution always runs over the whole curriculum.

use super::models::{Course, Curriculum};
use super::store::CompletedSet;
use std::fmt;

/// Derived display state of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Marked complete by the student
    Completed,
    /// All prerequisites completed
    Available,
    /// At least one prerequisite missing
    Locked,
}

impl VisualState {
    /// CSS class used by the rendered map
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Available => "available",
            Self::Locked => "locked",
        }
    }

    /// One-character marker for terminal output
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Completed => '✓',
            Self::Available => '○',
            Self::Locked => '✗',
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Resolve the state of a single course
#[must_use]
pub fn resolve(course: &Course, completed: &CompletedSet) -> VisualState {
    if completed.contains(&course.code) {
        VisualState::Completed
    } else if course.prerequisites.iter().all(|p| completed.contains(p)) {
        VisualState::Available
    } else {
        VisualState::Locked
    }
}

/// Resolve every course, in curriculum order
#[must_use]
pub fn resolve_all(curriculum: &Curriculum, completed: &CompletedSet) -> Vec<VisualState> {
    curriculum
        .courses()
        .iter()
        .map(|course| resolve(course, completed))
        .collect()
}

/// Aggregate counts over a resolved curriculum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressSummary {
    /// Courses in the completed state
    pub completed: usize,
    /// Courses in the available state
    pub available: usize,
    /// Courses in the locked state
    pub locked: usize,
    /// Credits of completed courses
    pub completed_credits: f32,
    /// Credits of all courses
    pub total_credits: f32,
}

impl ProgressSummary {
    /// Summarize `states`, which must be aligned with `curriculum.courses()`
    #[must_use]
    pub fn from_states(curriculum: &Curriculum, states: &[VisualState]) -> Self {
        let mut summary = Self::default();
        for (course, state) in curriculum.courses().iter().zip(states) {
            let credits = course.credits.unwrap_or(0.0);
            summary.total_credits += credits;
            match state {
                VisualState::Completed => {
                    summary.completed += 1;
                    summary.completed_credits += credits;
                }
                VisualState::Available => summary.available += 1,
                VisualState::Locked => summary.locked += 1,
            }
        }
        summary
    }

    /// Total number of courses
    #[must_use]
    pub const fn total(&self) -> usize {
        self.completed + self.available + self.locked
    }

    /// Percentage of courses completed, 0 for an empty curriculum
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            self.completed as f32 * 100.0 / self.total() as f32
        }
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} completed ({:.1}%), {} available, {} locked",
            self.completed,
            self.total(),
            self.percent_complete(),
            self.available,
            self.locked
        )?;
        if self.total_credits > 0.0 {
            write!(
                f,
                ", {:.1}/{:.1} credits",
                self.completed_credits, self.total_credits
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> CompletedSet {
        codes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_completed_takes_priority_over_prerequisites() {
        let course = Course::new("X", "X").with_prerequisites(["A", "B"]);
        assert_eq!(resolve(&course, &set(&["X"])), VisualState::Completed);
    }

    #[test]
    fn test_available_when_all_prerequisites_completed() {
        let course = Course::new("X", "X").with_prerequisites(["A", "B"]);
        assert_eq!(resolve(&course, &set(&["A", "B"])), VisualState::Available);
    }

    #[test]
    fn test_locked_when_any_prerequisite_missing() {
        let course = Course::new("X", "X").with_prerequisites(["A", "B"]);
        assert_eq!(resolve(&course, &set(&[])), VisualState::Locked);
        assert_eq!(resolve(&course, &set(&["A"])), VisualState::Locked);
    }

    #[test]
    fn test_no_prerequisites_is_available() {
        let course = Course::new("A", "A");
        assert_eq!(resolve(&course, &set(&[])), VisualState::Available);
    }

    #[test]
    fn test_undeclared_prerequisite_keeps_course_locked() {
        let course = Course::new("X", "X").with_prerequisites(["GHOST"]);
        assert_eq!(resolve(&course, &set(&[])), VisualState::Locked);
    }

    #[test]
    fn test_resolve_all_and_summary() {
        let mut curriculum = Curriculum::new("Test");
        curriculum
            .add_course(Course::new("A", "A").with_credits(4.0))
            .unwrap();
        curriculum
            .add_course(Course::new("B", "B").with_credits(6.0))
            .unwrap();
        curriculum
            .add_course(Course::new("C", "C").with_prerequisites(["A", "B"]))
            .unwrap();

        let states = resolve_all(&curriculum, &set(&["A"]));
        assert_eq!(
            states,
            vec![
                VisualState::Completed,
                VisualState::Available,
                VisualState::Locked
            ]
        );

        let summary = ProgressSummary::from_states(&curriculum, &states);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.locked, 1);
        assert!((summary.completed_credits - 4.0).abs() < f32::EPSILON);
        assert!((summary.total_credits - 10.0).abs() < f32::EPSILON);
        assert!(summary.to_string().starts_with("1/3 completed (33.3%)"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = ProgressSummary::default();
        assert!(summary.percent_complete().abs() < f32::EPSILON);
        assert_eq!(summary.to_string(), "0/0 completed (0.0%), 0 available, 0 locked");
    }
}
