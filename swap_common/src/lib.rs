//!
//! Common types shared by the quote engine and the swap client.
//!
//! This crate aggregates:
//! - `error` — unified error type `SwapError` used across the workspace.
//! - `result` — handy `Result<T, SwapError>` alias.
//! - `tokens` — the `Token` model and the injectable `TokenRegistry`.
//! - `trade` — `TradeType` and the `QuoteRequest` value submitted on every input change.
//! - `settings` — default timings, fee constants and the price source selector.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod settings;
pub mod tokens;
pub mod trade;

pub use error::SwapError;
pub use result::Result;
pub use tokens::{Token, TokenRegistry};
pub use trade::{QuoteRequest, TradeType};
