use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

/// Structural failures; returned before any fetch begins
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Round budget must be at least 1, got {0}")]
    InvalidRoundBudget(u32),

    #[error("Invalid crawl configuration: {0}")]
    InvalidConfig(String),

    #[error("Fetch pool closed")]
    PoolClosed,
}

/// Failure reported by a fetch collaborator.
///
/// Never fatal to a run: the affected id stays missing and is retried in the
/// next round.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Unavailable(String),
}

impl FetchError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
