//! Domain models of the quote engine.
//!
//! - `price_source` — the `PriceSource` strategy and its static backings.
//! - `engine` — the stateless `QuoteEngine` and amount parsing.
//! - `state` — the `QuoteState` published to subscribers.

pub mod engine;
pub mod price_source;
pub mod state;
