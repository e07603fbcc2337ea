//! Unified error types for fw-sbom-checker.
//!
//! Reconciliation itself never fails per library: missing history, unknown
//! versions and provider outages are encoded as data on the resolved record.
//! The errors here cover the edges of the system: reading SBOM files,
//! loading the release catalog, configuring providers and writing reports.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fw-sbom-checker operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CheckerError {
    /// Errors while reading an SBOM file
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while loading or querying the release catalog
    #[error("Release catalog error: {context}")]
    Catalog {
        context: String,
        #[source]
        source: CatalogErrorKind,
    },

    /// Errors raised by vulnerability providers and latest-version lookups
    #[error("Enrichment failed: {context}")]
    Enrichment {
        context: String,
        #[source]
        source: EnrichmentErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {0}")]
    Report(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration values that fail validation
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific SBOM parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown SBOM format - expected CycloneDX JSON or SPDX tag-value")]
    UnknownFormat,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("SPDX tag-value error: {0}")]
    TagValue(String),
}

/// Specific release catalog error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogErrorKind {
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),

    #[error("Catalog database error: {0}")]
    Database(String),

    #[error("Catalog format not supported by this build: {0}")]
    Unsupported(String),
}

/// Specific enrichment error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EnrichmentErrorKind {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),
}

/// Convenient Result type for fw-sbom-checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;

impl CheckerError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for an unrecognized SBOM file
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::parse(format!("at {}", path.into()), ParseErrorKind::UnknownFormat)
    }

    /// Create a catalog error with context
    pub fn catalog(context: impl Into<String>, source: CatalogErrorKind) -> Self {
        Self::Catalog {
            context: context.into(),
            source,
        }
    }

    /// Create an enrichment error
    pub fn enrichment(context: impl Into<String>, source: EnrichmentErrorKind) -> Self {
        Self::Enrichment {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Render an error followed by every `source()` in its chain, as
/// `"outer: cause: root cause"`.
pub fn full_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<std::io::Error> for CheckerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CheckerError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

/// Extension trait for adding context to errors.
///
/// Context strings are chained, outermost first:
///
/// ```ignore
/// use fw_sbom_checker::error::ErrorContext;
///
/// let text = std::fs::read_to_string(path)
///     .with_context(|| format!("reading catalog {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CheckerError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: CheckerError, new_ctx: &str) -> CheckerError {
    match err {
        CheckerError::Parse { context, source } => CheckerError::Parse {
            context: chain_context(new_ctx, &context),
            source,
        },
        CheckerError::Catalog { context, source } => CheckerError::Catalog {
            context: chain_context(new_ctx, &context),
            source,
        },
        CheckerError::Enrichment { context, source } => CheckerError::Enrichment {
            context: chain_context(new_ctx, &context),
            source,
        },
        CheckerError::Io {
            path,
            message,
            source,
        } => CheckerError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CheckerError::Report(msg) => CheckerError::Report(chain_context(new_ctx, &msg)),
        CheckerError::Config(msg) => CheckerError::Config(chain_context(new_ctx, &msg)),
        CheckerError::Validation(msg) => CheckerError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CheckerError::unknown_format("firmware.bin");
        assert!(err.to_string().contains("parse SBOM"));

        let err = CheckerError::catalog(
            "loading",
            CatalogErrorKind::NotFound(PathBuf::from("/missing.json")),
        );
        assert!(err.to_string().contains("Release catalog"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CheckerError::io("/data/catalog.json", io_err);
        assert!(err.to_string().contains("/data/catalog.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(CheckerError::catalog(
                "base",
                CatalogErrorKind::InvalidDocument("bad".to_string()),
            ))
        }

        fn outer() -> Result<()> {
            inner().context("middle layer").context("outer layer")
        }

        match outer() {
            Err(CheckerError::Catalog { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Catalog error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called);

        let err_result: Result<i32> = Err(CheckerError::config("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called);
    }

    #[test]
    fn test_full_message_includes_transport_cause() {
        let err = CheckerError::enrichment(
            "Failed to send OSV query",
            EnrichmentErrorKind::NetworkError("operation timed out".to_string()),
        );
        let message = full_message(&err);
        assert_eq!(
            message,
            "Enrichment failed: Failed to send OSV query: Network error: operation timed out"
        );

        let err = CheckerError::enrichment(
            "OSV query",
            EnrichmentErrorKind::ApiError("OSV API returned error status 503".to_string()),
        );
        assert!(full_message(&err).contains("status 503"));
    }

    #[test]
    fn test_full_message_does_not_repeat_io_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CheckerError::io("/data/catalog.json", io_err);
        assert_eq!(full_message(&err).matches("file not found").count(), 1);
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("outer", "middle: inner"), "outer: middle: inner");
    }
}
