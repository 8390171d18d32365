//! Observable quote state published by the controller.

use serde::Serialize;
use strum_macros::Display;
use swap_common::SwapError;

/// Why the latest quote attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum QuoteErrorKind {
    /// One of the symbols is not in the registry.
    #[strum(to_string = "Invalid tokens")]
    InvalidToken,
    /// Anything else that went wrong while fetching the quote.
    #[strum(to_string = "Failed to fetch quote")]
    QuoteComputationFailed,
}

impl From<&SwapError> for QuoteErrorKind {
    fn from(err: &SwapError) -> Self {
        match err {
            SwapError::InvalidToken(_) => QuoteErrorKind::InvalidToken,
            _ => QuoteErrorKind::QuoteComputationFailed,
        }
    }
}

/// Coarse lifecycle of the current state, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum QuotePhase {
    /// No quote and nothing in flight.
    Idle,
    /// A quote is being fetched.
    Loading,
    /// The latest quote is available.
    Settled,
    /// The latest attempt failed.
    Failed,
}

/// What a subscriber renders: `{quoteAmount, loading, error}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteState {
    /// Formatted quote, empty when there is none.
    pub quote_amount: String,
    /// `true` while an accepted request is being priced.
    pub loading: bool,
    /// Failure of the latest accepted request, if any.
    pub error: Option<QuoteErrorKind>,
}

impl QuoteState {
    /// Derives the display phase.
    pub fn phase(&self) -> QuotePhase {
        if self.loading {
            QuotePhase::Loading
        } else if self.error.is_some() {
            QuotePhase::Failed
        } else if self.quote_amount.is_empty() {
            QuotePhase::Idle
        } else {
            QuotePhase::Settled
        }
    }

    /// The user-facing error message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|kind| kind.to_string())
    }
}
