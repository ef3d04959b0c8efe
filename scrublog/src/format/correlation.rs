//! Ambient correlation ids merged into every entry.

/// Trace, request and user ids for the current unit of work.
///
/// Empty strings count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Correlation {
    /// Distributed trace identifier, emitted as top-level `trace`.
    pub trace: Option<String>,
    /// Request identifier, emitted as `labels.request_id`.
    pub request_id: Option<String>,
    /// User identifier, emitted as `labels.user_id`.
    pub user_id: Option<String>,
}

impl Correlation {
    /// No ids at all.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub(crate) fn trace_id(&self) -> Option<&str> {
        non_empty(self.trace.as_deref())
    }

    pub(crate) fn request(&self) -> Option<&str> {
        non_empty(self.request_id.as_deref())
    }

    pub(crate) fn user(&self) -> Option<&str> {
        non_empty(self.user_id.as_deref())
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}

/// Where the formatter reads correlation ids from on each call.
///
/// Implemented for [`NoCorrelation`], for a fixed [`Correlation`] and for any
/// `Fn() -> Correlation`, so a closure reading task-local or thread-local
/// state can be plugged in directly.
pub trait CorrelationSource: Send + Sync {
    /// Ids for the record currently being formatted.
    fn correlation(&self) -> Correlation;
}

/// A source that never has any ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCorrelation;

impl CorrelationSource for NoCorrelation {
    fn correlation(&self) -> Correlation {
        Correlation::default()
    }
}

impl CorrelationSource for Correlation {
    fn correlation(&self) -> Correlation {
        self.clone()
    }
}

impl<F> CorrelationSource for F
where
    F: Fn() -> Correlation + Send + Sync,
{
    fn correlation(&self) -> Correlation {
        self()
    }
}
