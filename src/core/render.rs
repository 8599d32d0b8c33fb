//! HTML rendering of the curriculum map
//!
//! Produces a self-contained page with one column per semester. Each course
//! carries its state as a CSS class. Locked courses link to a requirement
//! panel shown through `:target`, closed by its close link or by clicking
//! the backdrop around it.

use super::app::Malla;
use super::overlay::missing_requirements;
use super::store::Storage;
use crate::error::{MallaError, Result};
use askama::Template;
use std::fs;
use std::path::Path;

/// A course card in the rendered map
struct Card<'a> {
    code: &'a str,
    name: &'a str,
    class: &'static str,
    prerequisites: String,
    missing: Vec<String>,
}

/// A semester column
struct Column<'a> {
    label: String,
    cards: Vec<Card<'a>>,
}

#[derive(Template)]
#[template(path = "malla.html")]
struct MallaPage<'a> {
    title: &'a str,
    institution: &'a str,
    summary: String,
    columns: Vec<Column<'a>>,
    version: &'static str,
}

/// Render the map with current progress as HTML
///
/// # Errors
/// Returns [`MallaError::Render`] if the template fails to render
pub fn render_html<S: Storage>(malla: &Malla<S>) -> Result<String> {
    let curriculum = malla.curriculum();
    let completed = malla.completed();

    let columns = curriculum
        .by_semester()
        .into_iter()
        .map(|(semester, courses)| Column {
            label: semester.map_or_else(|| "Other".to_string(), |s| format!("Semester {s}")),
            cards: courses
                .into_iter()
                .map(|course| {
                    let state = malla
                        .state_of(&course.code)
                        .unwrap_or(super::resolver::VisualState::Locked);
                    Card {
                        code: &course.code,
                        name: &course.name,
                        class: state.css_class(),
                        prerequisites: course.prerequisites.join(" "),
                        missing: missing_requirements(course, curriculum, completed)
                            .into_iter()
                            .map(|m| m.name)
                            .collect(),
                    }
                })
                .collect(),
        })
        .collect();

    let page = MallaPage {
        title: &curriculum.name,
        institution: curriculum.institution.as_deref().unwrap_or(""),
        summary: malla.summary().to_string(),
        columns,
        version: crate::get_version(),
    };
    Ok(page.render()?)
}

/// Render the map and write it to `path`, creating parent directories
///
/// # Errors
/// Returns an error if rendering or writing fails
pub fn write_html<S: Storage>(malla: &Malla<S>, path: &Path) -> Result<()> {
    let html = render_html(malla)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| MallaError::io(parent, e))?;
        }
    }
    fs::write(path, html).map_err(|e| MallaError::io(path, e))
}
