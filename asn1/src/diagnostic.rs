use std::{error::Error, fmt::Display, ops::Range};

use crate::parser::{ErrorKind, ParserError};

/// Any kind of error or warning reported by the compiler
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Unique error code reference
    pub error_code: String,

    /// Severity of the error
    pub level: Level,

    /// Name of the diagnostic
    pub name: String,

    /// All labels with information about this diagnostic
    pub labels: Vec<Label>,
}

/// Additional information attached to a diagnostic
#[derive(Debug, Clone)]
pub struct Label {
    /// The source text the label refers to, to be located within the
    /// assignment that failed.
    pub fragment: Option<String>,

    /// Location within the source file that the diagnostic should be shown at.
    /// The range is a byte range into the source string, not a code point or
    /// character range.
    /// There is no guarantee that the range represents a valid index into the
    /// source file.
    pub location: Option<Range<usize>>,

    /// The message to display to the user.
    pub message: String,
}

/// Severity of a given diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// A fatal error
    Error,

    /// Should be fixed but the compiler can still continue.
    Warning,
}

impl Diagnostic {
    /// Create a new diagnostic
    fn new(level: Level, code: String) -> Self {
        Diagnostic {
            error_code: code,
            level,
            name: String::new(),
            labels: vec![],
        }
    }

    /// Create an error diagnostic
    pub(crate) fn error(code: impl Into<String>) -> Self {
        Self::new(Level::Error, code.into())
    }

    /// Create a warning diagnostic
    pub(crate) fn warning(code: impl Into<String>) -> Self {
        Self::new(Level::Warning, code.into())
    }

    /// Set the descriptive name of an error
    pub(crate) fn name(self, value: impl Into<String>) -> Self {
        Self {
            name: value.into(),
            ..self
        }
    }

    /// Add a label to the diagnostic
    pub(crate) fn label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }
}

impl Label {
    /// Create a new label
    pub(crate) fn new() -> Label {
        Label {
            fragment: None,
            location: None,
            message: String::new(),
        }
    }

    /// Set the message for this label
    pub(crate) fn message(self, value: impl Into<String>) -> Self {
        Self {
            message: value.into(),
            ..self
        }
    }

    /// Set the source text this label refers to
    pub(crate) fn fragment(self, value: impl Into<String>) -> Self {
        Self {
            fragment: Some(value.into()),
            ..self
        }
    }

    /// Set the location within the source file for this label
    pub fn loc(self, loc: Range<usize>) -> Self {
        Self {
            location: Some(loc),
            ..self
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}: {}", self.level, self.error_code, self.name)?;

        for label in &self.labels {
            writeln!(f)?;
            write!(f, "\t{:?}", self.level)?;
            if let Some(location) = &label.location {
                write!(f, " [{}..{}]", location.start, location.end)?;
            }
            write!(f, ": {}", label.message)?;
            if let Some(fragment) = &label.fragment {
                write!(f, " `{fragment}`")?;
            }
        }

        Ok(())
    }
}

impl Error for Diagnostic {}

impl From<&ParserError> for Diagnostic {
    fn from(value: &ParserError) -> Self {
        let (code, name) = match value.kind() {
            ErrorKind::Syntax => ("E0001", "Syntax error"),
            ErrorKind::Link => ("E0002", "Undefined reference"),
            ErrorKind::Unsupported => ("E0003", "Unsupported construct"),
            ErrorKind::DepthExceeded => ("E0004", "Nesting too deep"),
        };

        let label = Label::new()
            .message(format!("{} in {}", value.message(), value.path()))
            .fragment(value.fragment());

        Diagnostic::error(code).name(name).label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parser_error() {
        let error = ParserError::Link {
            path: "M.T.a".into(),
            message: "undefined type reference".into(),
            fragment: "Missing".into(),
        };

        let diagnostic = Diagnostic::from(&error);
        assert_eq!(diagnostic.error_code, "E0002");
        assert_eq!(diagnostic.level, Level::Error);
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].fragment.as_deref(), Some("Missing"));
        assert_eq!(
            diagnostic.to_string(),
            "Error E0002: Undefined reference\n\tError: undefined type reference in M.T.a `Missing`"
        );
    }
}
