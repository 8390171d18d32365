//! Shared defaults for quote timing and pricing, plus the price source selector.

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Quiet period after the last input change before a quote is requested.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
/// Simulated round trip of a quote fetch.
pub const DEFAULT_LATENCY_MS: u64 = 600;
/// Decimal places of a formatted quote.
pub const QUOTE_DECIMALS: u32 = 6;
/// Base symbol of the reference fixed-rate pair.
pub const FIXED_RATE_BASE: &str = "ETH";
/// Quote symbol of the reference fixed-rate pair.
pub const FIXED_RATE_QUOTE: &str = "USDC";

/// Multiplier applied to every quote (0.1% spread/fee).
pub fn fee_factor() -> Decimal {
    Decimal::new(999, 3)
}

/// Units of [`FIXED_RATE_QUOTE`] per unit of [`FIXED_RATE_BASE`].
pub fn fixed_rate() -> Decimal {
    Decimal::from(2500)
}

/// Backing used to value tokens against each other.
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
#[strum(serialize_all = "kebab-case")]
pub enum PriceSourceKind {
    /// Per-token reference prices from the registry.
    #[default]
    UsdTable,
    /// A table of fixed pairwise rates.
    FixedRate,
}
