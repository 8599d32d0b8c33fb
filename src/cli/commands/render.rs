//! Render command handler

use super::progress::open_malla;
use malla::config::Config;
use malla::core::render::write_html;
use malla::{error, info};
use std::path::{Path, PathBuf};

/// Default output path: `<reports_dir>/<curriculum stem>.html`
fn default_output(config: &Config) -> PathBuf {
    let stem = Path::new(&config.paths.curriculum)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("malla")
        .to_string();
    PathBuf::from(&config.paths.reports_dir).join(format!("{stem}.html"))
}

/// Render the map to HTML
pub fn run(config: &Config, output: Option<&Path>) {
    let malla = match open_malla(config) {
        Ok(malla) => malla,
        Err(e) => {
            error!("{e}");
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let output_path = output.map_or_else(|| default_output(config), Path::to_path_buf);
    match write_html(&malla, &output_path) {
        Ok(()) => {
            info!("Rendered map to {}", output_path.display());
            println!("✓ Map rendered: {}", output_path.display());
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_uses_curriculum_stem() {
        let mut config = Config::default();
        config.paths.curriculum = "/somewhere/civil.toml".to_string();
        config.paths.reports_dir = "/out".to_string();
        assert_eq!(default_output(&config), PathBuf::from("/out/civil.html"));
    }

    #[test]
    fn test_default_output_without_curriculum() {
        let mut config = Config::default();
        config.paths.reports_dir = "/out".to_string();
        assert_eq!(default_output(&config), PathBuf::from("/out/malla.html"));
    }
}
