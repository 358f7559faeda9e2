//! Error utilities shared by the dialer and the gRPC plumbing.
//!
//! The [`BoxError`] type is a type-erased error type used wherever it is not
//! that important what specific error type is returned, but rather that an
//! error occurred. [`ErrorContext`] can be used to attach a short, static
//! description to such errors while they bubble up.
//!
//! Dial specific failures are typed instead, see [`DialError`].
//!
//! [`DialError`]: crate::dial::DialError

use std::fmt::{self, Debug, Display};

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[repr(transparent)]
/// A type-erased error type that can be used as a trait object.
pub struct OpaqueError(BoxError);

impl OpaqueError {
    /// create an [`OpaqueError`] from an std error
    pub fn from_std(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(error))
    }

    /// create an [`OpaqueError`] from a display object
    pub fn from_display(msg: impl Display + Debug + Send + Sync + 'static) -> Self {
        Self::from_std(MessageError(msg))
    }

    /// Returns true if the underlying error is of type `T`.
    #[must_use]
    pub fn is<T>(&self) -> bool
    where
        T: std::error::Error + 'static,
    {
        self.0.is::<T>()
    }
}

impl Debug for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for OpaqueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Extends the `Result` and `Option` types with methods for adding context to errors.
///
/// # Examples
///
/// ```
/// use grpc_proxy_dial::error::ErrorContext;
///
/// let result = "hello".parse::<u16>().context("parse port");
/// assert_eq!("parse port: invalid digit found in string", result.unwrap_err().to_string());
/// ```
pub trait ErrorContext: private::Sealed {
    /// The resulting context type after adding context to the contained error.
    type Context;

    /// Add a static context to the contained error.
    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Debug + Send + Sync + 'static;

    /// Lazily add a context to the contained error, if it exists.
    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Debug + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    type Context = Result<T, OpaqueError>;

    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        self.map_err(|error| OpaqueError::from_std(ContextError { context, error }))
    }

    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Debug + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| {
            OpaqueError::from_std(ContextError {
                context: context(),
                error,
            })
        })
    }
}

impl<T> ErrorContext for Option<T> {
    type Context = Result<T, OpaqueError>;

    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        self.ok_or_else(|| {
            OpaqueError::from_std(ContextError {
                context,
                error: MessageError("Option is None"),
            })
        })
    }

    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Debug + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| {
            OpaqueError::from_std(ContextError {
                context: context(),
                error: MessageError("Option is None"),
            })
        })
    }
}

mod private {
    pub trait Sealed {}

    impl<T, E> Sealed for Result<T, E> where E: std::error::Error + Send + Sync + 'static {}
    impl<T> Sealed for Option<T> {}
}

#[repr(transparent)]
/// An error type that wraps a message.
struct MessageError<M>(M);

impl<M: Debug> Debug for MessageError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<M: Display> Display for MessageError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<M> std::error::Error for MessageError<M> where M: Display + Debug + 'static {}

/// An error wrapped with a human readable context.
struct ContextError<C, E> {
    context: C,
    error: E,
}

impl<C: Display, E: Debug> Debug for ContextError<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextError")
            .field("context", &format_args!("{}", self.context))
            .field("error", &self.error)
            .finish()
    }
}

impl<C: Display, E: Display> Display for ContextError<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.error)
    }
}

impl<C, E> std::error::Error for ContextError<C, E>
where
    C: Display,
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct CustomError(usize);

    impl Display for CustomError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Custom error ({})", self.0)
        }
    }

    impl std::error::Error for CustomError {}

    #[test]
    fn opaque_error_is() {
        let error = OpaqueError::from_std(CustomError(1));
        assert!(error.is::<CustomError>());
    }

    #[test]
    fn opaque_error_is_not() {
        let error = OpaqueError::from_display("hello");
        assert!(!error.is::<CustomError>());
    }

    #[test]
    fn result_context() {
        let result: Result<(), _> = Err(CustomError(2));
        let error = result.context("dial proxy").unwrap_err();
        assert_eq!(error.to_string(), "dial proxy: Custom error (2)");
    }

    #[test]
    fn result_context_keeps_source() {
        let result: Result<(), _> = Err(CustomError(3));
        let error = result.with_context(|| "lazy").unwrap_err();
        let source = std::error::Error::source(&error).unwrap();
        assert!(source.is::<CustomError>());
    }

    #[test]
    fn option_context() {
        let error = None::<u8>.context("missing port").unwrap_err();
        assert_eq!(error.to_string(), "missing port: Option is None");
    }
}
