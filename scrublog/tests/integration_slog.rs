//! Integration tests for the slog drain.
//!
//! These tests verify that:
//! - every slog record becomes one redacted JSON line
//! - logger and record key/values are redacted as context
//! - nested `serde` values survive as structured JSON

#![cfg(feature = "slog")]

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use scrublog::{Correlation, StructuredFormatter, slog::JsonLineDrain};
use serde::Serialize;
use serde_json::{Value, json};
use slog::{Drain, Logger, o};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn logger(buffer: &SharedBuffer) -> Logger {
    let drain = JsonLineDrain::new(buffer.clone()).fuse();
    Logger::root(drain, o!("service" => "billing", "api_key" => "sk_live_123"))
}

mod records {
    use super::*;

    #[test]
    fn message_level_and_location_are_kept() {
        let buffer = SharedBuffer::default();
        let log = logger(&buffer);
        slog::warn!(log, "retrying charge"; "attempt" => 2u64);

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        let entry = &lines[0];
        assert_eq!(entry["severity"], "WARNING");
        assert_eq!(entry["message"], "retrying charge");
        assert_eq!(entry["labels"]["module"], module_path!());
        assert!(entry["labels"]["line"].as_str().unwrap().parse::<u32>().is_ok());
        assert_eq!(entry["context"]["attempt"], json!(2));
        assert_eq!(entry["context"]["service"], "billing");
    }

    #[test]
    fn context_and_message_are_redacted() {
        let buffer = SharedBuffer::default();
        let log = logger(&buffer);
        slog::info!(
            log, "charging card 4111 1111 1111 1111";
            "password" => "hunter2", "note" => "token=abc"
        );

        let entry = &buffer.lines()[0];
        assert_eq!(entry["message"], "charging card REDACTED");
        assert_eq!(entry["context"]["api_key"], "REDACTED");
        assert_eq!(entry["context"]["password"], "REDACTED");
        assert_eq!(entry["context"]["note"], "token=REDACTED");
    }

    #[test]
    fn one_line_per_record() {
        let buffer = SharedBuffer::default();
        let log = logger(&buffer);
        slog::info!(log, "first\nrecord");
        slog::error!(log, "second");
        slog::crit!(log, "third");

        let severities: Vec<_> = buffer
            .lines()
            .iter()
            .map(|entry| entry["severity"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(severities, ["INFO", "ERROR", "CRITICAL"]);
    }
}

mod nested_values {
    use super::*;

    #[derive(Clone, Serialize)]
    struct Account {
        id: u64,
        email: String,
    }

    #[test]
    fn serde_values_are_walked() {
        let buffer = SharedBuffer::default();
        let log = logger(&buffer);
        let account = Account {
            id: 7,
            email: "a@b.com".into(),
        };
        slog::info!(log, "account loaded"; "account" => slog::Serde(account));

        let entry = &buffer.lines()[0];
        assert_eq!(
            entry["context"]["account"],
            json!({"id": 7, "email": "REDACTED"})
        );
    }
}

mod formatter {
    use super::*;

    #[test]
    fn custom_formatter_adds_correlation() {
        let buffer = SharedBuffer::default();
        let drain = JsonLineDrain::new(buffer.clone())
            .with_formatter(
                StructuredFormatter::new()
                    .with_correlation(Correlation::new().with_request_id("req-9")),
            )
            .fuse();
        let log = Logger::root(drain, o!());
        slog::info!(log, "hello");

        assert_eq!(buffer.lines()[0]["labels"]["request_id"], "req-9");
    }
}
