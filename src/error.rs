use std::fmt;

/// Broad classification of what went wrong.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ErrorKind {
    /// Generic/unclassified failure.
    Generic,

    /// Reading or parsing the input stream failed in a way that is not a
    /// recoverable per-line parse mismatch (e.g. the underlying I/O failed).
    Io,

    /// The program header (`P C`) could not be parsed.
    MissingHeader,

    /// A component could not allocate the memory it needed. Fatal: the
    /// two-phase availability check exists so that this can never surface
    /// mid-mutation, but if it does, the current command is abandoned.
    ResourceExhausted,
}

/// The crate's single error type. Carries a human-readable message plus an
/// [`ErrorKind`] for callers that want to branch on the failure class.
#[derive(Debug)]
pub struct ShopError {
    pub message: String,
    pub kind: ErrorKind,
}

impl ShopError {
    pub fn new(message: impl Into<String>) -> Self {
        ShopError {
            message: message.into(),
            kind: ErrorKind::Generic,
        }
    }

    pub fn of_kind(message: impl Into<String>, kind: ErrorKind) -> Self {
        ShopError {
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ShopError {}

impl From<std::io::Error> for ShopError {
    fn from(err: std::io::Error) -> Self {
        ShopError::of_kind(err.to_string(), ErrorKind::Io)
    }
}
