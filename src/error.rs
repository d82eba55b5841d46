//! Error types for wordgap-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the practice core.
///
/// All of these are local and recoverable; an exhausted card pool is a
/// plain `None`, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("card has an empty target word")]
    EmptyTargetWord,

    #[error("card '{word}' has an empty sentence template")]
    EmptySentence { word: String },

    #[error("no card is selected; call next_card first")]
    NoCardSelected,
}
