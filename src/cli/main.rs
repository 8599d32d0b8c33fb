//! Command-line interface entry point for `malla`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use malla::config::Config;
use malla::info;
use malla::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it.
    // `config set`/`unset` reload the file themselves, so overrides are never saved.
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    if let Err(e) = config.apply_overrides(&args.to_config_overrides()) {
        eprintln!("✗ {e}");
        std::process::exit(2);
    }

    // Runtime log level: CLI flag, then config logging.level, then warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Status { semester } => commands::progress::run_status(&config, semester),
        Command::Click { codes } => commands::progress::run_click(&config, &codes),
        Command::Requirements { code } => commands::progress::run_requirements(&config, &code),
        Command::Reset { yes } => commands::progress::run_reset(&config, yes),
        Command::Render { output } => commands::render::run(&config, output.as_deref()),
        Command::Shell => commands::shell::run(&config),
        Command::Config { subcommand } => commands::config::run(subcommand, &config, &defaults),
    }
}
