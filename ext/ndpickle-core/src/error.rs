use thiserror::Error;

/// Core error type for ndpickle operations
#[derive(Error, Debug)]
pub enum NdPickleError {
    /// A handler was requested for a type it cannot serve
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or inconsistent wire data
    #[error("Format error: {0}")]
    Format(String),

    /// A value reached the encoder with no handler able to reduce it
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Invalid argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Date/time arithmetic errors
    #[error("Time error: {0}")]
    Time(#[from] jiff::Error),
}

/// Result type alias for ndpickle operations
pub type Result<T> = std::result::Result<T, NdPickleError>;

impl NdPickleError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        NdPickleError::Configuration(msg.into())
    }

    /// Create a new format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        NdPickleError::Format(msg.into())
    }

    /// Create a new unsupported type error
    pub fn unsupported_type<S: Into<String>>(msg: S) -> Self {
        NdPickleError::UnsupportedType(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        NdPickleError::InvalidArgument(msg.into())
    }

    /// Whether this error reports malformed wire data
    pub fn is_format(&self) -> bool {
        matches!(self, NdPickleError::Format(_))
    }

    /// Prefix the message with `ctx`, keeping the error category
    fn prefixed(self, ctx: String) -> Self {
        match self {
            NdPickleError::Configuration(msg) => {
                NdPickleError::Configuration(format!("{}: {}", ctx, msg))
            }
            NdPickleError::Format(msg) => NdPickleError::Format(format!("{}: {}", ctx, msg)),
            NdPickleError::UnsupportedType(msg) => {
                NdPickleError::UnsupportedType(format!("{}: {}", ctx, msg))
            }
            NdPickleError::InvalidArgument(msg) => {
                NdPickleError::InvalidArgument(format!("{}: {}", ctx, msg))
            }
            other => NdPickleError::Format(format!("{}: {}", ctx, other)),
        }
    }

    /// Re-file as a format error; data-model invariants broken by decoded
    /// input are wire problems, not caller mistakes
    fn into_format(self, ctx: String) -> Self {
        match self {
            NdPickleError::Format(msg) | NdPickleError::InvalidArgument(msg) => {
                NdPickleError::Format(format!("{}: {}", ctx, msg))
            }
            other => NdPickleError::Format(format!("{}: {}", ctx, other)),
        }
    }
}

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, ctx: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;

    /// Add context and report the failure as a [`NdPickleError::Format`]
    fn format_context<S: Into<String>>(self, ctx: S) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<NdPickleError>,
{
    fn context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| e.into().prefixed(ctx.into()))
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().prefixed(f().into()))
    }

    fn format_context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| e.into().into_format(ctx.into()))
    }
}
