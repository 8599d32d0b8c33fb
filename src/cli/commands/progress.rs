//! Progress command handlers: status, click, requirements, reset

use super::confirm_on_terminal;
use malla::config::Config;
use malla::core::store::{validate_storage_key, DEFAULT_STORAGE_KEY};
use malla::core::{ClickOutcome, Curriculum, FileStorage, Malla, ProgressStore, Storage};
use malla::{error, info, verbose, MallaError};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Storage key from the config, [`DEFAULT_STORAGE_KEY`] when unset
fn storage_key(config: &Config) -> &str {
    if config.progress.storage_key.is_empty() {
        DEFAULT_STORAGE_KEY
    } else {
        config.progress.storage_key.as_str()
    }
}

/// File that holds the stored progress for this config
#[must_use]
pub fn progress_file(config: &Config) -> PathBuf {
    FileStorage::new(&config.paths.data_dir).path_for(storage_key(config))
}

/// Load the configured curriculum and its stored progress
///
/// # Errors
/// Returns an error if the configured storage key is not a valid key or the
/// curriculum file cannot be loaded
pub fn open_malla(config: &Config) -> Result<Malla<FileStorage>, MallaError> {
    let key = storage_key(config);
    validate_storage_key(key)?;

    let curriculum_path = Path::new(&config.paths.curriculum);
    let curriculum = Curriculum::load(curriculum_path)?;
    verbose!(
        "✓ Curriculum loaded from: {} ({} courses)",
        curriculum_path.display(),
        curriculum.len()
    );

    let store = ProgressStore::with_key(FileStorage::new(&config.paths.data_dir), key);
    Ok(Malla::open(curriculum, store))
}

/// Open the map or exit with an error message
fn open_or_exit(config: &Config) -> Malla<FileStorage> {
    open_malla(config).unwrap_or_else(|e| {
        error!("{e}");
        eprintln!("✗ {e}");
        std::process::exit(1);
    })
}

/// Format the map grouped by semester, optionally restricted to one semester
pub fn format_status<S: Storage>(malla: &Malla<S>, semester: Option<u32>) -> String {
    let curriculum = malla.curriculum();
    let mut out = String::new();

    match &curriculum.institution {
        Some(institution) => {
            let _ = writeln!(out, "{} ({institution})", curriculum.name);
        }
        None => {
            let _ = writeln!(out, "{}", curriculum.name);
        }
    }

    for (group, courses) in curriculum.by_semester() {
        if semester.is_some() && group != semester {
            continue;
        }
        let _ = match group {
            Some(s) => writeln!(out, "\nSemester {s}"),
            None => writeln!(out, "\nOther"),
        };
        for course in courses {
            if let Some(state) = malla.state_of(&course.code) {
                let _ = writeln!(out, "  {} {:<10} {}", state.marker(), course.code, course.name);
            }
        }
    }

    let _ = writeln!(out, "\n{}", malla.summary());
    out
}

/// Describe the result of a click for terminal output
pub fn describe_click<S: Storage>(malla: &Malla<S>, code: &str, outcome: &ClickOutcome) -> String {
    let name = malla.curriculum().display_name(code);
    match outcome {
        ClickOutcome::Completed { unlocked } => {
            let mut text = format!("✓ Completed {code} ({name})");
            if !unlocked.is_empty() {
                let _ = write!(text, "\n  Unlocked: {}", unlocked.join(", "));
            }
            text
        }
        ClickOutcome::Undone { relocked } => {
            let mut text = format!("↺ Undid {code} ({name})");
            if !relocked.is_empty() {
                let _ = write!(text, "\n  Locked again: {}", relocked.join(", "));
            }
            text
        }
        ClickOutcome::ShowedRequirements => format!("✗ {code} is locked\n{}", malla.overlay()),
    }
}

/// Print the map
pub fn run_status(config: &Config, semester: Option<u32>) {
    let malla = open_or_exit(config);
    print!("{}", format_status(&malla, semester));
}

/// Click on each code in order. Unknown codes are reported and skipped.
pub fn run_click(config: &Config, codes: &[String]) {
    let mut malla = open_or_exit(config);
    let mut failed = false;

    for code in codes {
        match malla.click(code) {
            Ok(outcome) => {
                info!("Click on {code}: {outcome:?}");
                println!("{}", describe_click(&malla, code, &outcome));
            }
            Err(e) => {
                error!("Click on {code} failed: {e}");
                eprintln!("✗ {e}");
                failed = true;
            }
        }
    }

    verbose!("\n{}", malla.summary());
    if failed {
        std::process::exit(1);
    }
}

/// Print the missing prerequisites of a course
pub fn run_requirements(config: &Config, code: &str) {
    let mut malla = open_or_exit(config);
    match malla.show_requirements(code) {
        Ok(overlay) => {
            print!("{overlay}");
            let required_by: Vec<&str> = malla
                .curriculum()
                .dependents(code)
                .map(|c| c.code.as_str())
                .collect();
            if !required_by.is_empty() {
                verbose!("Required by: {}", required_by.join(", "));
            }
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

/// Clear stored progress, asking first unless `yes`
pub fn run_reset(config: &Config, yes: bool) {
    let mut malla = open_or_exit(config);
    if malla.completed().is_empty() {
        println!("✓ No progress stored");
        return;
    }

    let prompt = format!("Forget {} completed course(s)?", malla.completed().len());
    if !yes && !confirm_on_terminal(&prompt) {
        println!("✗ Reset cancelled");
        return;
    }

    if let Err(e) = malla.reset() {
        eprintln!("✗ Failed to clear progress: {e}");
        std::process::exit(1);
    }
    println!("✓ Progress cleared");
}
