//! Error types for SQL generation and value marshaling.

/// Coarse classification of a [`DialectError`].
///
/// Callers that need to react to a failure switch on this instead of the
/// rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An option the operation knows about, but the dialect does not accept.
    UnsupportedOption,
    /// An option the operation does not know about at all.
    UnknownOption,
    /// A feature or data type the dialect does not support.
    UnsupportedFeature,
    /// An application value rejected by a data type.
    Validation,
    /// A value the escaper cannot turn into a literal.
    Escaping,
    /// A database value or default string that could not be interpreted.
    Parse,
    /// Malformed caller input.
    InvalidArgument,
}

/// Errors raised while generating SQL or marshaling values.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    /// The dialect does not support an option of the operation.
    #[error("The following options are not supported by {operation} in {dialect}: {option}")]
    UnsupportedOption {
        /// Dialect name.
        dialect: &'static str,
        /// Operation name.
        operation: &'static str,
        /// The offending option.
        option: &'static str,
    },

    /// The option is not part of the operation's option set.
    #[error("{operation} does not accept the option {option}")]
    UnknownOption {
        /// Operation name.
        operation: &'static str,
        /// The offending option.
        option: String,
    },

    /// The dialect does not support the requested feature.
    #[error("{feature} is not supported by the {dialect} dialect")]
    UnsupportedFeature {
        /// Dialect name.
        dialect: &'static str,
        /// Human readable feature name.
        feature: String,
    },

    /// A value did not satisfy a data type.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A value could not be escaped.
    #[error("Cannot escape value: {0}")]
    Escaping(String),

    /// A raw value could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input to a generator function.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DialectError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedOption { .. } => ErrorKind::UnsupportedOption,
            Self::UnknownOption { .. } => ErrorKind::UnknownOption,
            Self::UnsupportedFeature { .. } => ErrorKind::UnsupportedFeature,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Escaping(_) => ErrorKind::Escaping,
            Self::Parse(_) | Self::Json(_) => ErrorKind::Parse,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            dialect,
            feature: feature.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type for generation and marshaling operations.
pub type Result<T> = std::result::Result<T, DialectError>;
