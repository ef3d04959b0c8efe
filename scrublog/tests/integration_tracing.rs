//! Integration tests for the tracing layer.
//!
//! These tests verify that:
//! - events are written as one redacted JSON line each
//! - event fields become redacted context
//! - the crate's own diagnostics are not written back through the layer

#![cfg(feature = "tracing")]

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use scrublog::{Correlation, StructuredFormatter, tracing::JsonLineLayer};
use serde_json::{Value, json};
use tracing_subscriber::layer::SubscriberExt;

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

fn capture(emit: impl FnOnce()) -> Vec<Value> {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let layer = JsonLineLayer::new(move || writer.clone());
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, emit);
    buffer.lines()
}

mod events {
    use super::*;

    #[test]
    fn message_and_fields_are_formatted() {
        let lines = capture(|| {
            tracing::warn!(attempt = 3, user_email = "a@b.com", "login failed: password=Secret!23");
        });
        assert_eq!(lines.len(), 1);
        let entry = &lines[0];
        assert_eq!(entry["severity"], "WARNING");
        assert_eq!(entry["message"], "login failed: password=REDACTED");
        assert_eq!(entry["labels"]["module"], module_path!());
        assert_eq!(
            entry["context"],
            json!({"attempt": 3, "user_email": "REDACTED"})
        );
    }

    #[test]
    fn levels_map_to_wire_names() {
        let lines = capture(|| {
            tracing::error!("e");
            tracing::info!("i");
            tracing::debug!("d");
            tracing::trace!("t");
        });
        let severities: Vec<_> = lines
            .iter()
            .map(|entry| entry["severity"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(severities, ["ERROR", "INFO", "DEBUG", "DEBUG"]);
    }

    #[test]
    fn debug_and_display_fields_are_strings() {
        let lines = capture(|| {
            let path = std::path::Path::new("/tmp/x");
            tracing::info!(path = ?path, note = %"token=abc", "opened");
        });
        assert_eq!(lines[0]["context"]["path"], "\"/tmp/x\"");
        assert_eq!(lines[0]["context"]["note"], "token=REDACTED");
    }

    #[test]
    fn own_diagnostics_are_skipped() {
        let lines = capture(|| {
            tracing::warn!(target: "scrublog::formatter", "internal");
            tracing::info!(target: "app", "external");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["message"], "external");
    }

    #[test]
    fn fallback_warning_does_not_loop() {
        let lines = capture(|| {
            let formatter = StructuredFormatter::new();
            let line = formatter.format(None::<scrublog::LogRecord>);
            tracing::info!(fallback = %line, "formatted");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["message"], "formatted");
    }
}

mod correlation {
    use super::*;

    #[test]
    fn formatter_can_be_replaced() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let layer = JsonLineLayer::new(move || writer.clone()).with_formatter(
            StructuredFormatter::new().with_correlation(Correlation::new().with_trace("t-1")),
        );
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || tracing::info!("hello"));
        assert_eq!(buffer.lines()[0]["trace"], "t-1");
    }
}
