use thiserror::Error;

/// Any error that can be emitted by the parser.  Every variant carries the
/// module qualified path of the entity being parsed and the text fragment
/// that could not be handled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// Malformed construct, duplicate name, misplaced marker or unconsumed text
    #[error("{path}: {message}: {fragment:?}")]
    Syntax {
        path: String,
        message: String,
        fragment: String,
    },

    /// Reference to a symbol that has not been registered
    #[error("{path}: {message}: {fragment:?}")]
    Link {
        path: String,
        message: String,
        fragment: String,
    },

    /// Valid ASN.1 that this parser does not handle
    #[error("{path}: {message}: {fragment:?}")]
    Unsupported {
        path: String,
        message: String,
        fragment: String,
    },

    /// Recursion depth limit reached in the parser (try to avoid stack overflow)
    #[error("{path}: nesting too deep: {fragment:?}")]
    DepthExceeded { path: String, fragment: String },
}

/// The category of a [`ParserError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    Syntax,
    Link,
    Unsupported,
    DepthExceeded,
}

pub type Result<T = (), E = ParserError> = std::result::Result<T, E>;

impl ParserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::Syntax { .. } => ErrorKind::Syntax,
            ParserError::Link { .. } => ErrorKind::Link,
            ParserError::Unsupported { .. } => ErrorKind::Unsupported,
            ParserError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
        }
    }

    /// Path of the entity that was being parsed
    pub fn path(&self) -> &str {
        match self {
            ParserError::Syntax { path, .. }
            | ParserError::Link { path, .. }
            | ParserError::Unsupported { path, .. }
            | ParserError::DepthExceeded { path, .. } => path,
        }
    }

    /// The text that caused the error
    pub fn fragment(&self) -> &str {
        match self {
            ParserError::Syntax { fragment, .. }
            | ParserError::Link { fragment, .. }
            | ParserError::Unsupported { fragment, .. }
            | ParserError::DepthExceeded { fragment, .. } => fragment,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParserError::Syntax { message, .. }
            | ParserError::Link { message, .. }
            | ParserError::Unsupported { message, .. } => message,
            ParserError::DepthExceeded { .. } => "nesting too deep",
        }
    }
}
