//! Record timestamps.

use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::Value;

/// When a record was emitted, as provided by the source.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordTime {
    /// A real point in time.
    Instant(DateTime<FixedOffset>),
    /// Seconds since the Unix epoch.
    Epoch(f64),
    /// Text, which may or may not be an RFC 3339 timestamp.
    Text(String),
    /// Any other value.
    Other(Value),
}

impl RecordTime {
    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Classifies a JSON value; `null` means no timestamp.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => Some(
                number
                    .as_f64()
                    .map_or_else(|| Self::Other(value.clone()), Self::Epoch),
            ),
            other => Some(Self::Other(other.clone())),
        }
    }

    /// Renders the timestamp as ISO-8601.
    ///
    /// Time-like values use the canonical RFC 3339 form. Anything else is
    /// stringified, and an empty string falls back to the current time.
    pub fn to_iso8601(&self) -> String {
        match self {
            Self::Instant(instant) => instant.to_rfc3339(),
            Self::Epoch(seconds) => {
                epoch_to_datetime(*seconds).map_or_else(|| seconds.to_string(), |dt| dt.to_rfc3339())
            }
            Self::Text(text) if text.trim().is_empty() => Utc::now().to_rfc3339(),
            Self::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map_or_else(|_| text.clone(), |dt| dt.to_rfc3339()),
            Self::Other(value) => value.to_string(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn epoch_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::<Utc>::from_timestamp(whole as i64, nanos)
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RecordTime {
    fn from(instant: DateTime<Tz>) -> Self {
        Self::Instant(instant.fixed_offset())
    }
}

impl From<SystemTime> for RecordTime {
    fn from(time: SystemTime) -> Self {
        DateTime::<Utc>::from(time).into()
    }
}

#[cfg(feature = "time")]
impl From<time::OffsetDateTime> for RecordTime {
    fn from(time: time::OffsetDateTime) -> Self {
        let nanos = time.unix_timestamp_nanos();
        let offset = FixedOffset::east_opt(time.offset().whole_seconds());
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let converted = DateTime::<Utc>::from_timestamp(
            nanos.div_euclid(1_000_000_000) as i64,
            nanos.rem_euclid(1_000_000_000) as u32,
        )
        .zip(offset)
        .map(|(utc, offset)| utc.with_timezone(&offset));
        converted.map_or_else(|| Self::Text(time.to_string()), Self::Instant)
    }
}
