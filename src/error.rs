use std::fmt;

/// Errors that can occur while running a protocol chain.
///
/// A rejected validation is *not* an error: it shows up as an erased
/// [`ExtractionResult`](crate::ExtractionResult) from `run`, or `false`
/// from `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The terminal strategy is misconfigured
    Configuration(ConfigurationError),
    /// The platform could not complete the extraction
    Backend(BackendError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "Configuration error: {}", e),
            Error::Backend(e) => write!(f, "Backend error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration(e) => Some(e),
            Error::Backend(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Configuration(e)
    }
}

impl From<BackendError> for Error {
    fn from(e: BackendError) -> Self {
        Error::Backend(e)
    }
}

/// A protocol configuration that failed its `verify()` self-check.
///
/// Recoverable: the caller can fix the configuration and try again
/// before anything is sent to a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    kind: ConfigurationErrorKind,
    message: String,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    pub fn new(kind: ConfigurationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ConfigurationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigurationError {}

/// The kind of configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationErrorKind {
    /// Requested measurement size is zero or above the supported maximum
    InvalidSize,
    /// Requested shot count is zero
    InvalidShots,
    /// Total number of requested bits does not fit in memory
    Overflow,
}

impl fmt::Display for ConfigurationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize => write!(f, "invalid size"),
            Self::InvalidShots => write!(f, "invalid shots"),
            Self::Overflow => write!(f, "size overflow"),
        }
    }
}

/// The platform could not service an extraction request.
///
/// Surfaced unchanged through every validation layer; nothing in this
/// crate retries or swallows it.
///
/// # Examples
///
/// ```
/// use qrand_core::{BackendError, BackendErrorKind};
///
/// let error = BackendError::new(BackendErrorKind::QuotaExceeded, "job limit reached");
/// assert_eq!(error.kind(), BackendErrorKind::QuotaExceeded);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    kind: BackendErrorKind,
    message: String,
}

impl BackendError {
    /// Creates a new backend error.
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.message)
    }
}

impl std::error::Error for BackendError {}

/// Kind of backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Backend could not be reached.
    Unavailable,
    /// Backend refused the job because of usage limits.
    QuotaExceeded,
    /// Backend answered with data that does not match the request.
    MalformedResponse,
    /// Backend accepted the job but failed while executing it.
    Execution,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "backend unavailable"),
            Self::QuotaExceeded => write!(f, "quota exceeded"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::Execution => write!(f, "execution failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn backend_error_converts_and_keeps_source() {
        let backend = BackendError::new(BackendErrorKind::Unavailable, "connection refused");
        let error: Error = backend.clone().into();

        assert_eq!(error, Error::Backend(backend));
        assert!(error.source().is_some());
        assert_eq!(
            error.to_string(),
            "Backend error: backend unavailable (connection refused)"
        );
    }

    #[test]
    fn configuration_error_display() {
        let error = ConfigurationError::new(ConfigurationErrorKind::InvalidSize, "0 qubits");

        assert_eq!(error.kind(), ConfigurationErrorKind::InvalidSize);
        assert_eq!(error.message(), "0 qubits");
        assert_eq!(error.to_string(), "invalid size: 0 qubits");
    }
}
