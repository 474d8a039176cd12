//! Error taxonomy
//!
//! Failures are either startup-fatal (the round never starts) or contract
//! violations on a session that has not started or has already ended.
//! Degenerate geometry is handled in place and never surfaces here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// An asset needed before the loop is armed failed to load
    #[error("failed to load asset `{asset}`: {reason}")]
    AssetLoad { asset: String, reason: String },

    /// Configuration values out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Session used before `start`
    #[error("round has not started")]
    RoundNotStarted,

    /// Session handed over after it was already started
    #[error("round is already in progress")]
    RoundInProgress,

    /// Session mutated after the deadline fired
    #[error("round has ended")]
    RoundEnded,
}

impl GameError {
    pub fn asset_load(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that abort setup rather than a single call
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::AssetLoad { .. } | Self::InvalidConfig(_) | Self::ConfigParse(_) | Self::Io(_)
        )
    }
}
