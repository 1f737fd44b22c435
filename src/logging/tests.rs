// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use super::{FileFormat, LogConfig, LogLevel};

#[test]
fn test_log_level_ordering() {
    assert!(LogLevel::SILENT < LogLevel::ERROR);
    assert!(LogLevel::TRACE < LogLevel::DUMP);
    assert_eq!(LogLevel::default(), LogLevel::INFO);
    assert_eq!(u8::from(LogLevel::WARN), 2);
}

#[test]
fn test_log_level_range() {
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).expect_err("7 is out of range");
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'output_log_level' in section '[global]': log level must be 0-6, got 7"
    );
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(LogLevel::try_from(4u8).ok(), Some(LogLevel::DEBUG));
}

#[test]
fn test_filter_directives() {
    let directives: Vec<String> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::directives)
        .collect();
    assert_eq!(
        directives,
        [
            "off",
            "error",
            "warn",
            "info",
            "warn,procctl=debug",
            "warn,procctl=trace",
            "trace",
        ]
    );
    assert_eq!(LogLevel::SILENT.max_level(), None);
    assert_eq!(LogLevel::DUMP.max_level(), Some(tracing::Level::TRACE));
}

#[test]
fn test_log_level_serde() {
    let json = serde_json::to_string(&LogLevel::DEBUG).expect("serialize");
    assert_eq!(json, "4");
    let parsed: LogLevel = serde_json::from_str("2").expect("deserialize");
    assert_eq!(parsed, LogLevel::WARN);
    assert!(serde_json::from_str::<LogLevel>("9").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), None);
    assert_eq!(config.file_format(), FileFormat::Text);
    assert!(!config.timestamps());
}

#[test]
fn test_log_config_builder() {
    let config = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .with_file_level(LogLevel::DEBUG)
        .with_log_file("logs/procctl.log")
        .with_file_format(FileFormat::Json)
        .with_timestamps(true)
        .build();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some(Path::new("logs/procctl.log")));
    assert_eq!(config.file_format(), FileFormat::Json);
    assert!(config.timestamps());
}

#[test]
fn test_log_config_maybe_log_file() {
    let config = LogConfig::builder().maybe_with_log_file(None::<PathBuf>).build();
    assert_eq!(config.log_file(), None);
}
