//! Exception stack trace rendering.
//!
//! Traces are rendered in the familiar layout
//!
//! ```text
//! Traceback (most recent call last):
//!   File "app.py", line 10, in handler
//!     do_thing()
//! ValueError: boom
//! ```
//!
//! and then squeezed onto one line by escaping the line breaks. A trace that
//! cannot be rendered produces a description of the problem instead.

use std::panic::{self, AssertUnwindSafe};

use super::{escape::escape_line_breaks, panic_message};
use crate::record::{ExceptionInfo, Frame, TracebackError, TracebackHandle, frames_from_json};

/// First line of every rendered frame list.
pub const TRACEBACK_HEADER: &str = "Traceback (most recent call last):";

/// Prefix of the text emitted when a traceback cannot be rendered.
pub const TRACEBACK_ERROR_PREFIX: &str = "Traceback processing error: ";

/// Renders frames as multi-line text, outermost frame first.
pub fn render_frames(frames: &[Frame]) -> String {
    let mut lines = Vec::with_capacity(frames.len() * 2 + 1);
    lines.push(TRACEBACK_HEADER.to_string());
    for frame in frames {
        lines.push(format!(
            "  File \"{}\", line {}, in {}",
            frame.filename, frame.lineno, frame.function
        ));
        if let Some(source) = frame.source.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            lines.push(format!("    {source}"));
        }
    }
    lines.join("\n")
}

fn render_handle(handle: &TracebackHandle) -> Result<String, TracebackError> {
    match handle {
        TracebackHandle::Frames(frames) => Ok(render_frames(frames)),
        TracebackHandle::Text(text) => Ok(text.trim_end().to_string()),
        TracebackHandle::Json(value) => frames_from_json(value).map(|frames| render_frames(&frames)),
        TracebackHandle::Source(source) => {
            panic::catch_unwind(AssertUnwindSafe(|| source.frames()))
                .map_err(|payload| TracebackError::Panicked(panic_message(&*payload)))?
                .map(|frames| render_frames(&frames))
        }
    }
}

fn describe_failure(err: &TracebackError) -> String {
    format!("{TRACEBACK_ERROR_PREFIX}{err}")
}

/// Renders a traceback without escaping; `None` in, `None` out.
pub fn render_traceback(handle: Option<&TracebackHandle>) -> Option<String> {
    handle.map(|handle| render_handle(handle).unwrap_or_else(|err| describe_failure(&err)))
}

/// Renders a traceback and escapes it onto a single line.
///
/// `None` means there is no exception and yields `None`. Rendering failures
/// yield `"Traceback processing error: <cause>"`.
pub fn format_traceback(handle: Option<&TracebackHandle>) -> Option<String> {
    render_traceback(handle).map(|text| escape_line_breaks(&text).into_owned())
}

/// Renders the traceback of an exception without escaping.
///
/// Frame-based traces end with a `Type: value` line. Pre-rendered text is
/// used as given.
pub fn render_exception(info: &ExceptionInfo) -> Option<String> {
    let handle = info.traceback.as_ref()?;
    let rendered = match render_handle(handle) {
        Ok(text) => text,
        Err(err) => return Some(describe_failure(&err)),
    };
    if matches!(handle, TracebackHandle::Text(_)) {
        return Some(rendered);
    }
    let summary = match (info.type_name.as_deref(), info.value.as_deref()) {
        (Some(type_name), Some(value)) if !value.is_empty() => format!("{type_name}: {value}"),
        (Some(type_name), _) => type_name.to_string(),
        (None, Some(value)) => value.to_string(),
        (None, None) => return Some(rendered),
    };
    Some(format!("{rendered}\n{summary}"))
}

/// Like [`render_exception`], escaped onto a single line.
pub fn format_exception(info: &ExceptionInfo) -> Option<String> {
    render_exception(info).map(|text| escape_line_breaks(&text).into_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::record::TracebackSource;

    fn frames() -> Vec<Frame> {
        vec![
            Frame::new("app.py", 10, "handler").with_source("process(req)"),
            Frame::new("core.py", 22, "process").with_source("validate(x)"),
            Frame::new("core.py", 40, "validate").with_source("raise ValueError(\"boom\")"),
        ]
    }

    #[test]
    fn none_in_none_out() {
        assert_eq!(format_traceback(None), None);
        assert_eq!(format_exception(&ExceptionInfo::new("E", "v")), None);
    }

    #[test]
    fn renders_frames_in_order() {
        let text = render_frames(&frames());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], TRACEBACK_HEADER);
        assert_eq!(lines[1], "  File \"app.py\", line 10, in handler");
        assert_eq!(lines[2], "    process(req)");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn formatted_trace_is_single_line() {
        let handle = TracebackHandle::Frames(frames());
        let text = format_traceback(Some(&handle)).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains('\r'));
        assert!(text.contains("in validate"));
        assert!(text.contains("\\n  File"));
    }

    #[test]
    fn exception_summary_is_appended() {
        let info = ExceptionInfo::new("ValueError", "boom").with_traceback(frames());
        let text = format_exception(&info).unwrap();
        assert!(text.ends_with("\\nValueError: boom"));
    }

    #[test]
    fn pre_rendered_text_is_kept() {
        let info = ExceptionInfo::new("E", "v")
            .with_traceback(TracebackHandle::Text("line one\r\nline two\n".into()));
        assert_eq!(format_exception(&info).unwrap(), "line one\\r\\nline two");
    }

    #[test]
    fn malformed_json_is_described() {
        let handle = TracebackHandle::Json(json!({"not": "frames"}));
        assert_eq!(
            format_traceback(Some(&handle)).unwrap(),
            "Traceback processing error: expected a list of frames, found object"
        );
    }

    #[derive(Debug)]
    struct Failing;

    impl TracebackSource for Failing {
        fn frames(&self) -> Result<Vec<Frame>, TracebackError> {
            Err(TracebackError::Source("frame walker unavailable".into()))
        }
    }

    #[derive(Debug)]
    struct Exploding;

    impl TracebackSource for Exploding {
        fn frames(&self) -> Result<Vec<Frame>, TracebackError> {
            panic!("frame walker exploded")
        }
    }

    #[test]
    fn failing_sources_are_described() {
        let handle = TracebackHandle::Source(Arc::new(Failing));
        assert_eq!(
            format_traceback(Some(&handle)).unwrap(),
            "Traceback processing error: frame walker unavailable"
        );

        let handle = TracebackHandle::Source(Arc::new(Exploding));
        let text = format_traceback(Some(&handle)).unwrap();
        assert!(text.starts_with(TRACEBACK_ERROR_PREFIX));
        assert!(text.contains("frame walker exploded"));
    }
}
