//! Integration tests for logger behavior.

use malla::logger::{level, set_level, set_level_from_str, Level};
use malla::{debug, error, get_version, info, warn};

#[test]
fn version_is_not_empty() {
    assert!(!get_version().trim().is_empty());
}

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    assert_eq!(level(), Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
}
