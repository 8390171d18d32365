//! Trade direction and the quote request submitted on every input change.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which side of the swap the entered amount fixes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TradeType {
    /// The amount is what the user sells; the quote is what they receive.
    #[default]
    ExactInput,
    /// The amount is what the user wants to receive; the quote is what they pay.
    ExactOutput,
}

/// Snapshot of the swap form inputs.
///
/// Requests have no identity of their own: the controller tags each one with a
/// generation number when it arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Symbol of the token being sold.
    pub token_in: String,
    /// Symbol of the token being bought.
    pub token_out: String,
    /// Raw user input, as typed.
    pub amount: String,
    /// Whether `amount` fixes the input or the output side.
    pub trade_type: TradeType,
}

impl QuoteRequest {
    /// Creates a new request.
    pub fn new(token_in: &str, token_out: &str, amount: &str, trade_type: TradeType) -> Self {
        QuoteRequest {
            token_in: String::from(token_in),
            token_out: String::from(token_out),
            amount: String::from(amount),
            trade_type,
        }
    }

    /// Shorthand for an [`TradeType::ExactInput`] request.
    pub fn exact_input(token_in: &str, token_out: &str, amount: &str) -> Self {
        Self::new(token_in, token_out, amount, TradeType::ExactInput)
    }
}
