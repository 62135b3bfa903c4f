use std::{fs, thread::sleep, time::Duration};

use dash_shell::logging::{build_filter, init};
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn debug_filter_honours_rust_log() {
    std::env::set_var("RUST_LOG", "dash_shell=trace");
    assert_eq!(build_filter(true).to_string(), "dash_shell=trace");
    assert_eq!(build_filter(false).to_string(), "info");
    std::env::remove_var("RUST_LOG");
    assert_eq!(build_filter(true).to_string(), "debug");
}

#[test]
#[serial]
fn file_output_is_plain_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.log");

    init(false, Some(path.clone()));
    tracing::info!(module = "session", "module toggled");
    tracing::debug!("filtered out at info level");

    sleep(Duration::from_millis(100));

    let contents = fs::read_to_string(&path).expect("log file should exist");
    assert!(contents.contains("module toggled"));
    assert!(contents.contains("module=\"session\""));
    assert!(!contents.contains("filtered out"));
    assert!(!contents.contains('\u{1b}'), "file output must not contain ANSI escapes");
}
