//! Data models for `malla`

pub mod course;
pub mod curriculum;

pub use course::Course;
pub use curriculum::Curriculum;
