//! Error types shared across the swap workspace.
//!
//! The `SwapError` enum unifies failures from token-list loading, quote
//! computation, and the controller's channel plumbing, so every crate can
//! propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the quoter and the client.
#[derive(Error, Debug)]
pub enum SwapError {
    /// I/O error originating from the standard library (token files, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A token symbol could not be resolved in the registry or price table.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The same symbol was registered twice.
    #[error("Duplicate token symbol: {0}")]
    DuplicateToken(String),

    /// A token carries a zero or negative reference price.
    #[error("Reference price for {symbol} must be positive")]
    InvalidPrice {
        /// Offending token symbol.
        symbol: String,
    },

    /// The amount is not a positive, finite decimal.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The configured price source has no rate for this pair.
    #[error("No rate available for {token_in} -> {token_out}")]
    UnsupportedPair {
        /// Token being sold.
        token_in: String,
        /// Token being bought.
        token_out: String,
    },

    /// Checked decimal arithmetic overflowed or divided by zero.
    #[error("Arithmetic error: {0}")]
    Arithmetic(&'static str),

    /// Channel send failed (e.g., the controller thread is gone).
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// A line typed into the client could not be understood.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Unexpected failure while computing a quote.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The token list file is structurally valid JSON but not a usable registry.
    #[error("Parse token list error: {0}")]
    ParseTokenList(String),
}

impl<T> From<PoisonError<T>> for SwapError {
    fn from(err: PoisonError<T>) -> Self {
        SwapError::MutexLock(err.to_string())
    }
}
