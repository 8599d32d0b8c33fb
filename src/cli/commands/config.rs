//! `config` subcommand: show and edit the stored configuration
//!
//! `get` shows the effective values, command-line overrides included.
//! `set`, `unset` and `reset` work on the config file as stored, so overrides
//! passed on the same command line are never written back.

use super::confirm;
use super::progress::progress_file;
use crate::args::ConfigSubcommand;
use malla::config::{Config, CONFIG_KEYS};
use malla::core::Curriculum;
use malla::{info, MallaError, Result};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Dispatch config subcommands
///
/// `effective` is the loaded config with overrides applied.
pub fn run(subcommand: Option<ConfigSubcommand>, effective: &Config, defaults: &Config) {
    let config_file = Config::get_config_file_path();
    let result = match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => {
            println!("\n=== Configuration ({}) ===\n", config_file.display());
            print!("{effective}");
            println!("progress file = {}", progress_file(effective).display());
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => {
            describe_value(effective, &key).map(|text| print!("{text}"))
        }
        Some(ConfigSubcommand::Set { key, value }) => {
            set_value(&config_file, &key, &value).map(|stored| {
                let shown = stored.get(&key).unwrap_or(value);
                println!("✓ Set {key} = {shown}");
            })
        }
        Some(ConfigSubcommand::Unset { key }) => {
            unset_value(&config_file, defaults, &key).map(|stored| {
                let shown = stored.get(&key).unwrap_or_default();
                println!("✓ Reset {key} to default ({shown})");
            })
        }
        Some(ConfigSubcommand::Reset) => {
            reset_file(&config_file, io::stdin().lock(), &mut io::stdout()).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

/// Text printed by `config get KEY`
///
/// Keys that decide where progress lives also show the resolved progress file.
///
/// # Errors
/// Returns [`MallaError::Config`] listing the known keys if `key` is unknown
pub fn describe_value(config: &Config, key: &str) -> Result<String> {
    let value = config.get(key).ok_or_else(|| {
        MallaError::Config(format!(
            "Unknown config key: '{key}'. Known keys: {}",
            CONFIG_KEYS.join(", ")
        ))
    })?;

    let mut text = format!("{value}\n");
    let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
    if normalized == "storage_key" || normalized == "data_dir" {
        let _ = writeln!(text, "  progress file: {}", progress_file(config).display());
    }
    Ok(text)
}

/// Set `key` in the config file at `config_file` and save it
///
/// A new `curriculum` must point to a loadable curriculum file.
/// Returns the config as written.
///
/// # Errors
/// Returns an error for unknown keys, invalid values, an unloadable
/// curriculum, or if the file cannot be written; the file is unchanged then
pub fn set_value(config_file: &Path, key: &str, value: &str) -> Result<Config> {
    let mut stored = Config::load_from(config_file);
    stored.set(key, value)?;

    if key.trim().eq_ignore_ascii_case("curriculum") {
        let curriculum = Curriculum::load(&stored.paths.curriculum)?;
        info!(
            "Curriculum {} has {} courses",
            curriculum.name,
            curriculum.len()
        );
    }

    stored.save_to(config_file)?;
    Ok(stored)
}

/// Restore `key` to its default in the config file at `config_file`
///
/// # Errors
/// Returns an error for unknown keys or if the file cannot be written
pub fn unset_value(config_file: &Path, defaults: &Config, key: &str) -> Result<Config> {
    let mut stored = Config::load_from(config_file);
    stored.unset(key, defaults)?;
    stored.save_to(config_file)?;
    Ok(stored)
}

/// Delete the config file after confirmation. Returns `true` if it was deleted.
///
/// # Errors
/// Returns an error if the file exists but cannot be deleted
pub fn reset_file<R: BufRead, W: Write>(
    config_file: &Path,
    input: R,
    output: &mut W,
) -> Result<bool> {
    if !config_file.exists() {
        writeln!(output, "✓ Config is already at defaults").ok();
        return Ok(false);
    }

    if !confirm("Reset config to defaults?", input, output) {
        writeln!(output, "✗ Reset cancelled").ok();
        return Ok(false);
    }

    Config::reset_at(config_file)?;
    writeln!(output, "✓ Config reset to defaults").ok();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use malla::config::ConfigOverrides;
    use std::io::Cursor;
    use tempfile::TempDir;

    const CURRICULUM: &str = "samples/mallas/ingenieria_civil.toml";

    fn config_file(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        Config::from_defaults()
            .save_to(&path)
            .expect("Failed to write config");
        path
    }

    #[test]
    fn test_set_value_does_not_persist_overrides() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir);

        // What main builds for `malla -c tmp.toml --storage-key tmp config set level info`
        let mut effective = Config::load_from(&path);
        effective
            .apply_overrides(&ConfigOverrides {
                curriculum: Some("tmp.toml".to_string()),
                storage_key: Some("tmp".to_string()),
                ..ConfigOverrides::default()
            })
            .unwrap();

        set_value(&path, "level", "info").unwrap();

        let stored = Config::load_from(&path);
        let defaults = Config::from_defaults();
        assert_eq!(stored.logging.level, "info");
        assert_eq!(stored.paths.curriculum, defaults.paths.curriculum);
        assert_eq!(stored.progress.storage_key, defaults.progress.storage_key);
        assert_ne!(stored.paths.curriculum, effective.paths.curriculum);
    }

    #[test]
    fn test_set_curriculum_must_load() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir);
        let missing = dir.path().join("missing.toml");

        let err = set_value(&path, "curriculum", &missing.to_string_lossy()).unwrap_err();
        assert!(matches!(err, MallaError::Io { .. }));
        assert_eq!(
            Config::load_from(&path).paths.curriculum,
            Config::from_defaults().paths.curriculum
        );

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "name = ").unwrap();
        let err = set_value(&path, "curriculum", &broken.to_string_lossy()).unwrap_err();
        assert!(matches!(err, MallaError::CurriculumParse { .. }));

        let stored = set_value(&path, "curriculum", CURRICULUM).unwrap();
        assert_eq!(stored.paths.curriculum, CURRICULUM);
        assert_eq!(Config::load_from(&path).paths.curriculum, CURRICULUM);
    }

    #[test]
    fn test_set_invalid_value_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir);
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(set_value(&path, "storage_key", "../escape").is_err());
        assert!(set_value(&path, "colour", "blue").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_unset_value_restores_default() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir);
        let defaults = Config::from_defaults();

        set_value(&path, "storage_key", "civil").unwrap();
        let stored = unset_value(&path, &defaults, "storage-key").unwrap();
        assert_eq!(stored.progress.storage_key, defaults.progress.storage_key);
        assert_eq!(
            Config::load_from(&path).progress.storage_key,
            defaults.progress.storage_key
        );
    }

    #[test]
    fn test_describe_value_shows_progress_file() {
        let mut config = Config::from_defaults();
        config.paths.data_dir = "/data".to_string();
        config.progress.storage_key = "civil".to_string();

        let text = describe_value(&config, "storage_key").unwrap();
        assert!(text.starts_with("civil\n"));
        assert!(text.contains("progress file: "));
        assert!(text.contains("civil.json"));

        let text = describe_value(&config, "data-dir").unwrap();
        assert!(text.starts_with("/data\n"));
        assert!(text.contains("progress file: "));

        assert_eq!(
            describe_value(&config, "level").unwrap(),
            format!("{}\n", config.logging.level)
        );
    }

    #[test]
    fn test_describe_unknown_key_lists_known_keys() {
        let err = describe_value(&Config::from_defaults(), "colour").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'colour'"));
        assert!(message.contains("storage_key"));
    }

    #[test]
    fn test_reset_file_asks_first() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir);

        let mut out = Vec::new();
        assert!(!reset_file(&path, Cursor::new("n\n"), &mut out).unwrap());
        assert!(path.exists());
        assert!(String::from_utf8_lossy(&out).contains("Reset cancelled"));

        let mut out = Vec::new();
        assert!(reset_file(&path, Cursor::new("yes\n"), &mut out).unwrap());
        assert!(!path.exists());

        let mut out = Vec::new();
        assert!(!reset_file(&path, Cursor::new(""), &mut out).unwrap());
        assert!(String::from_utf8_lossy(&out).contains("already at defaults"));
    }
}
