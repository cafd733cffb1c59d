//! Error types for the fiscal document auditor.
//!
//! Only two kinds of failure are surfaced as errors: the rate table cannot be
//! loaded (fatal for a batch) and a single document cannot be parsed or read
//! (local to that document). Missing fields, missing rates and malformed numbers
//! degrade to "no expectation" or zero and never reach this type.

use thiserror::Error;

/// The main error type for the auditor.
///
/// # Example
///
/// ```
/// use fiscal_audit::error::AuditError;
///
/// let error = AuditError::RateSourceNotFound {
///     source_name: "./data/aliquotas.json".to_string(),
/// };
/// assert_eq!(error.to_string(), "Rate table source not found: ./data/aliquotas.json");
/// ```
#[derive(Debug, Error)]
pub enum AuditError {
    /// A single rate table source does not exist.
    #[error("Rate table source not found: {source_name}")]
    RateSourceNotFound {
        /// The path or label of the source.
        source_name: String,
    },

    /// A rate table source exists but could not be read.
    #[error("Failed to read rate table '{source_name}': {message}")]
    RateSourceReadError {
        /// The path or label of the source.
        source_name: String,
        /// A description of the I/O failure.
        message: String,
    },

    /// A rate table source was read but its content could not be parsed.
    #[error("Failed to parse rate table '{source_name}': {message}")]
    RateSourceParseError {
        /// The path or label of the source.
        source_name: String,
        /// A description of the parse error.
        message: String,
    },

    /// No configured source produced a usable rate table.
    #[error("Rate table could not be loaded from any source (tried: {})", attempted.join(", "))]
    RateSourceUnavailable {
        /// Every source that was attempted, in order.
        attempted: Vec<String>,
    },

    /// A payload was not well-formed XML.
    #[error("Unparseable document: {message}")]
    UnparseableDocument {
        /// A description of the parse failure.
        message: String,
    },

    /// A document file could not be read.
    #[error("Failed to read document '{path}': {message}")]
    DocumentReadError {
        /// The path of the document.
        path: String,
        /// A description of the I/O failure.
        message: String,
    },
}

/// A type alias for Results that return AuditError.
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_source_not_found_displays_source() {
        let error = AuditError::RateSourceNotFound {
            source_name: "/missing/aliquotas.json".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Rate table source not found: /missing/aliquotas.json"
        );
    }

    #[test]
    fn test_rate_source_parse_error_displays_source_and_message() {
        let error = AuditError::RateSourceParseError {
            source_name: "inline".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse rate table 'inline': expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_rate_source_unavailable_lists_attempted_sources() {
        let error = AuditError::RateSourceUnavailable {
            attempted: vec!["a.json".to_string(), "b.json".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Rate table could not be loaded from any source (tried: a.json, b.json)"
        );
    }

    #[test]
    fn test_unparseable_document_displays_message() {
        let error = AuditError::UnparseableDocument {
            message: "unexpected end of stream".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unparseable document: unexpected end of stream"
        );
    }

    #[test]
    fn test_document_read_error_displays_path_and_message() {
        let error = AuditError::DocumentReadError {
            path: "notas/123.xml".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read document 'notas/123.xml': permission denied"
        );
    }

    #[test]
    fn test_rate_source_read_error_keeps_io_message() {
        let error = AuditError::RateSourceReadError {
            source_name: "./data".to_string(),
            message: "Is a directory (os error 21)".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read rate table './data': Is a directory (os error 21)"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<AuditError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unavailable() -> AuditResult<()> {
            Err(AuditError::RateSourceUnavailable { attempted: vec![] })
        }

        fn propagates_error() -> AuditResult<()> {
            returns_unavailable()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
