//! Interactive shell: one line of input is one event
//!
//! While the requirement overlay is open it covers the map, so a course
//! click lands outside the panel and only dismisses it.

use super::progress::{describe_click, format_status, open_malla};
use malla::config::Config;
use malla::core::{Malla, OverlayClick, Storage};
use malla::error;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  click CODE          click on a course
  requirements CODE   show missing prerequisites of a course
  close               close the requirements panel
  outside             click outside the requirements panel
  inside              click inside the requirements panel
  status [N]          show the map (optionally one semester)
  help                show this help
  quit                leave the shell";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Click on a course
    Click(String),
    /// Open the overlay for a course
    Requirements(String),
    /// Click on the overlay
    Overlay(OverlayClick),
    /// Print the map
    Status(Option<u32>),
    /// Print help
    Help,
    /// Leave
    Quit,
    /// Blank line
    Nothing,
}

impl ShellCommand {
    /// Parse one input line
    ///
    /// # Errors
    /// Returns a message for unknown commands or missing arguments
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Self::Nothing);
        };
        let argument = words.next();
        if words.next().is_some() {
            return Err(format!("Too many arguments for '{command}'"));
        }

        let need_code = |name: &str| {
            argument
                .map(str::to_string)
                .ok_or_else(|| format!("'{name}' needs a course code"))
        };

        match command.to_ascii_lowercase().as_str() {
            "click" | "c" => need_code("click").map(Self::Click),
            "requirements" | "req" | "r" => need_code("requirements").map(Self::Requirements),
            "close" => Ok(Self::Overlay(OverlayClick::CloseButton)),
            "outside" => Ok(Self::Overlay(OverlayClick::Outside)),
            "inside" => Ok(Self::Overlay(OverlayClick::Inside)),
            "status" | "s" => argument
                .map(|n| {
                    n.parse::<u32>()
                        .map_err(|_| format!("Invalid semester '{n}'"))
                })
                .transpose()
                .map(Self::Status),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("Unknown command '{other}' (try 'help')")),
        }
    }
}

/// Apply one command. Returns `false` when the session should end.
pub fn dispatch<S: Storage, W: Write>(
    malla: &mut Malla<S>,
    command: ShellCommand,
    out: &mut W,
) -> io::Result<bool> {
    match command {
        ShellCommand::Click(code) => {
            if malla.overlay().is_visible() {
                malla.overlay_click(OverlayClick::Outside);
                writeln!(out, "Requirements panel closed")?;
                return Ok(true);
            }
            match malla.click(&code) {
                Ok(outcome) => writeln!(out, "{}", describe_click(malla, &code, &outcome))?,
                Err(e) => {
                    error!("Click on {code} failed: {e}");
                    writeln!(out, "✗ {e}")?;
                }
            }
        }
        ShellCommand::Requirements(code) => match malla.show_requirements(&code) {
            Ok(overlay) => write!(out, "{overlay}")?,
            Err(e) => writeln!(out, "✗ {e}")?,
        },
        ShellCommand::Overlay(target) => {
            if malla.overlay_click(target) {
                writeln!(out, "Requirements panel closed")?;
            } else if !malla.overlay().is_visible() {
                writeln!(out, "No requirements panel open")?;
            }
        }
        ShellCommand::Status(semester) => write!(out, "{}", format_status(malla, semester))?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Nothing => {}
    }
    Ok(true)
}

/// Read commands from `input` until EOF or `quit`
///
/// # Errors
/// Returns an error if reading input or writing output fails
pub fn run_loop<S: Storage, R: BufRead, W: Write>(
    malla: &mut Malla<S>,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    write!(out, "{}", format_status(malla, None))?;
    writeln!(out, "Type 'help' for commands.")?;
    for line in input.lines() {
        let line = line?;
        let keep_going = match ShellCommand::parse(&line) {
            Ok(command) => dispatch(malla, command, out)?,
            Err(message) => {
                writeln!(out, "✗ {message}")?;
                true
            }
        };
        if !keep_going {
            break;
        }
        out.flush()?;
    }
    Ok(())
}

/// Run the interactive shell on stdin/stdout
pub fn run(config: &Config) {
    let mut malla = match open_malla(config) {
        Ok(malla) => malla,
        Err(e) => {
            error!("{e}");
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = run_loop(&mut malla, stdin.lock(), &mut stdout) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}
