//! Application state and click handling

use super::models::{Course, Curriculum};
use super::overlay::{OverlayClick, RequirementOverlay};
use super::resolver::{resolve_all, ProgressSummary, VisualState};
use super::store::{CompletedSet, ProgressStore, Storage};
use crate::error::{MallaError, Result};
use crate::{debug, info};

/// What a click on a course did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Available course added to the Completed-set
    Completed {
        /// Courses that went from locked to available
        unlocked: Vec<String>,
    },
    /// Completed course removed from the Completed-set
    Undone {
        /// Courses that went from available to locked
        relocked: Vec<String>,
    },
    /// Locked course; nothing changed and the overlay is open
    ShowedRequirements,
}

/// A curriculum map with the student's progress
///
/// Owns the Completed-set and its persisted mirror. Every mutation goes
/// through [`Malla::click`] (or [`Malla::reset`]) which persists first and
/// then re-resolves all courses.
#[derive(Debug)]
pub struct Malla<S: Storage> {
    curriculum: Curriculum,
    completed: CompletedSet,
    store: ProgressStore<S>,
    states: Vec<VisualState>,
    overlay: RequirementOverlay,
}

impl<S: Storage> Malla<S> {
    /// Load persisted progress and resolve every course
    pub fn open(curriculum: Curriculum, store: ProgressStore<S>) -> Self {
        let completed = store.load();
        info!(
            "Loaded {} completed course(s) for {}",
            completed.len(),
            curriculum.name
        );
        let mut malla = Self {
            curriculum,
            completed,
            store,
            states: Vec::new(),
            overlay: RequirementOverlay::new(),
        };
        malla.repaint();
        malla
    }

    fn repaint(&mut self) {
        self.states = resolve_all(&self.curriculum, &self.completed);
    }

    /// Handle a click on the course with `code`
    ///
    /// - completed: removed from the set (undo)
    /// - available: added to the set
    /// - locked: the requirement overlay opens, nothing is mutated
    ///
    /// # Errors
    /// Returns [`MallaError::UnknownCourse`] for undeclared codes, or a storage
    /// error if persisting fails. In the latter case the in-memory set keeps
    /// the mutation and the map is repainted.
    pub fn click(&mut self, code: &str) -> Result<ClickOutcome> {
        let state = self.state_of(code).ok_or_else(|| MallaError::UnknownCourse {
            code: code.to_string(),
        })?;
        debug!("Click on {code} ({state})");

        let before = self.states.clone();
        match state {
            VisualState::Completed => {
                self.completed.remove(code);
            }
            VisualState::Available => {
                self.completed.insert(code.to_string());
            }
            VisualState::Locked => {
                if let Some(course) = self.curriculum.get(code) {
                    self.overlay.open(course, &self.curriculum, &self.completed);
                }
                return Ok(ClickOutcome::ShowedRequirements);
            }
        }

        let saved = self.store.save(&self.completed);
        self.repaint();
        saved?;

        Ok(match state {
            VisualState::Completed => ClickOutcome::Undone {
                relocked: self.changed_since(&before, VisualState::Available, VisualState::Locked),
            },
            _ => ClickOutcome::Completed {
                unlocked: self.changed_since(&before, VisualState::Locked, VisualState::Available),
            },
        })
    }

    fn changed_since(&self, before: &[VisualState], from: VisualState, to: VisualState) -> Vec<String> {
        self.curriculum
            .courses()
            .iter()
            .zip(before.iter().zip(&self.states))
            .filter(|(_, (old, new))| **old == from && **new == to)
            .map(|(course, _)| course.code.clone())
            .collect()
    }

    /// Open the overlay for any declared course, whatever its state
    ///
    /// Only a locked course lists missing prerequisites. A completed or
    /// available course opens with an empty list.
    ///
    /// # Errors
    /// Returns [`MallaError::UnknownCourse`] for undeclared codes
    pub fn show_requirements(&mut self, code: &str) -> Result<&RequirementOverlay> {
        let locked = self.state_of(code) == Some(VisualState::Locked);
        let course = self
            .curriculum
            .get(code)
            .ok_or_else(|| MallaError::UnknownCourse {
                code: code.to_string(),
            })?;
        self.overlay.open(course, &self.curriculum, &self.completed);
        if !locked {
            self.overlay.missing.clear();
        }
        Ok(&self.overlay)
    }

    /// Forward a click to the overlay. Returns `true` if it closed.
    pub fn overlay_click(&mut self, target: OverlayClick) -> bool {
        self.overlay.click(target)
    }

    /// Clear all progress, persist, and repaint
    ///
    /// # Errors
    /// Returns an error if the stored value cannot be removed
    pub fn reset(&mut self) -> Result<()> {
        self.completed.clear();
        self.overlay.close();
        let cleared = self.store.clear();
        self.repaint();
        cleared
    }

    /// State of the course with `code`, `None` if undeclared
    #[must_use]
    pub fn state_of(&self, code: &str) -> Option<VisualState> {
        self.curriculum
            .courses()
            .iter()
            .position(|c| c.code == code)
            .map(|i| self.states[i])
    }

    /// Courses paired with their current state, in curriculum order
    pub fn courses(&self) -> impl Iterator<Item = (&Course, VisualState)> {
        self.curriculum
            .courses()
            .iter()
            .zip(self.states.iter().copied())
    }

    /// Aggregate progress
    #[must_use]
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary::from_states(&self.curriculum, &self.states)
    }

    /// The static course declarations
    #[must_use]
    pub const fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// The current Completed-set
    #[must_use]
    pub const fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    /// The requirement overlay
    #[must_use]
    pub const fn overlay(&self) -> &RequirementOverlay {
        &self.overlay
    }

    /// The progress store
    #[must_use]
    pub const fn store(&self) -> &ProgressStore<S> {
        &self.store
    }
}
