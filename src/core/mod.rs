//! Core curriculum-map logic, independent of any front end

pub mod app;
pub mod models;
pub mod overlay;
pub mod render;
pub mod resolver;
pub mod store;

pub use app::{ClickOutcome, Malla};
pub use models::{Course, Curriculum};
pub use overlay::{OverlayClick, RequirementOverlay};
pub use resolver::{ProgressSummary, VisualState};
pub use store::{CompletedSet, FileStorage, MemoryStorage, ProgressStore, Storage};
