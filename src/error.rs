/// Error types for the hostlit library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Template string is malformed.
    #[error("invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// Template references a field that does not exist.
    #[error("unknown template field: {{{name}}}")]
    UnknownField { name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The authority pattern failed to parse.
    #[error("pattern syntax error: {0}")]
    Syntax(#[from] regex_syntax::Error),

    /// A regex compilation error.
    #[error("regex error: {0}")]
    Regex(#[from] regex_automata::meta::BuildError),
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
