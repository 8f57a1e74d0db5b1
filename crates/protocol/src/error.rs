use thiserror::Error;

/// Result type for reference parsing
pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Errors raised while turning a relation pointer into an entry key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// Pointer has fewer than two path segments
    #[error("Malformed reference {pointer:?}: expected at least two segments")]
    TooFewSegments { pointer: String },

    /// Category segment is not one of the catalog categories
    #[error("Malformed reference {pointer:?}: unknown category {category:?}")]
    UnknownCategory { pointer: String, category: String },

    /// Id segment is empty
    #[error("Malformed reference {pointer:?}: empty id")]
    EmptyId { pointer: String },
}

impl ReferenceError {
    /// The pointer text that failed to parse
    pub fn pointer(&self) -> &str {
        match self {
            Self::TooFewSegments { pointer }
            | Self::UnknownCategory { pointer, .. }
            | Self::EmptyId { pointer } => pointer,
        }
    }
}
