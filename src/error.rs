//! Error type for `malla` operations.
//!
//! Absent or malformed stored progress is not an error (it reads as an empty
//! set) and neither is a prerequisite code that names no declared course.
//! Everything else that can fail surfaces as a [`MallaError`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a curriculum, persisting progress or rendering.
#[derive(Debug, Error)]
pub enum MallaError {
    /// Filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that was being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Curriculum file is not valid TOML or does not match the schema.
    #[error("Failed to parse curriculum {path}: {message}")]
    CurriculumParse {
        /// Curriculum file path (empty when parsed from a string)
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Two course declarations share the same code.
    #[error("Duplicate course code '{code}' in curriculum")]
    DuplicateCourse {
        /// The repeated code
        code: String,
    },

    /// A click or query referenced a code that is not declared.
    #[error("Unknown course '{code}'")]
    UnknownCourse {
        /// The unknown code
        code: String,
    },

    /// Completed-set could not be serialized.
    #[error("Failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),

    /// HTML template rendering failed.
    #[error("Failed to render map: {0}")]
    Render(#[from] askama::Error),

    /// Invalid configuration key or value.
    #[error("{0}")]
    Config(String),
}

impl MallaError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, MallaError>;
