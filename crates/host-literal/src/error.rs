/// Errors returned by the string conveniences on [`CanonicalHost`].
///
/// The span based parsers never return these; they report failure with
/// `Option`, `bool` or [`ParseOutcome::NotAnAddress`].
///
/// [`CanonicalHost`]: crate::CanonicalHost
/// [`ParseOutcome::NotAnAddress`]: crate::ParseOutcome::NotAnAddress
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The text is not a numeric host literal in the selected dialect.
    #[error("not a numeric host literal: {literal:?}")]
    NotAnAddress { literal: String },

    /// A literal was recognized but stopped before the end of the text.
    #[error("host literal {literal:?} ends at byte {consumed}")]
    TrailingInput { literal: String, consumed: usize },
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
