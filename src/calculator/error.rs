use thiserror::Error;

/// Errors returned by [`Calculator`](super::Calculator) queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Input out of range, not a whole number, or a configuration that would
    /// divide by zero.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Even a perfect win rate over `total_games` cannot reach the target.
    #[error("{total_games} games is not enough to climb out of the division even at a 100% win rate")]
    InsufficientGames { total_games: u64 },
}

impl CalcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidArgument(msg.into())
    }
}
