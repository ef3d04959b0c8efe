//! Redaction failures.

/// Result type for structured redaction.
pub type RedactionResult<T> = Result<T, RedactionError>;

/// Reasons a structure could not be redacted.
///
/// Pattern redaction of free text cannot fail; only the recursive walk over
/// structured data has a failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RedactionError {
    /// The structure is nested deeper than the configured limit.
    ///
    /// This is also how self-referential data built through shared handles
    /// surfaces, instead of recursing without bound.
    #[error("structure nested deeper than {limit} levels")]
    DepthExceeded {
        /// The configured maximum depth.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_copied_by_value() {
        let err = RedactionError::DepthExceeded { limit: 3 };
        let copied = err;
        assert_eq!(err, copied);
        assert_eq!(err.to_string(), "structure nested deeper than 3 levels");
    }
}
