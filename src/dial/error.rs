use crate::error::BoxError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The kind of a [`DialError`].
pub enum DialErrorKind {
    /// The configured proxy (or the dial target) has no usable host:port.
    Config,
    /// The underlying transport connect failed (DNS failure, refused connection, ...).
    Connect,
    /// The caller cancelled the dial attempt before the connect completed.
    Cancelled,
}

impl DialErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Config => "invalid dial config",
            Self::Connect => "connect failed",
            Self::Cancelled => "dial cancelled",
        }
    }
}

impl fmt::Display for DialErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a [`Dialer`] when it failed to establish a connection.
///
/// Dial errors are never retried by the dialer itself,
/// retries are the responsibility of the caller.
///
/// [`Dialer`]: super::Dialer
pub struct DialError {
    kind: DialErrorKind,
    source: Option<BoxError>,
}

impl DialError {
    /// Create a [`DialErrorKind::Config`] error.
    pub fn config(source: impl Into<BoxError>) -> Self {
        Self {
            kind: DialErrorKind::Config,
            source: Some(source.into()),
        }
    }

    /// Create a [`DialErrorKind::Connect`] error.
    pub fn connect(source: impl Into<BoxError>) -> Self {
        Self {
            kind: DialErrorKind::Connect,
            source: Some(source.into()),
        }
    }

    /// Create a [`DialErrorKind::Cancelled`] error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            kind: DialErrorKind::Cancelled,
            source: None,
        }
    }

    /// The [`DialErrorKind`] of this error.
    #[must_use]
    pub fn kind(&self) -> DialErrorKind {
        self.kind
    }

    /// Returns true if this is a [`DialErrorKind::Config`] error.
    #[must_use]
    pub fn is_config(&self) -> bool {
        self.kind == DialErrorKind::Config
    }

    /// Returns true if this is a [`DialErrorKind::Connect`] error.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.kind == DialErrorKind::Connect
    }

    /// Returns true if this is a [`DialErrorKind::Cancelled`] error.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == DialErrorKind::Cancelled
    }
}

impl fmt::Debug for DialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("DialError");
        d.field("kind", &self.kind);
        if let Some(source) = &self.source {
            d.field("source", source);
        }
        d.finish()
    }
}

impl fmt::Display for DialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl std::error::Error for DialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn std::error::Error + 'static))
    }
}
