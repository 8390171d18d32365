//! Command-line arguments for the swap client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use swap_common::settings::{DEFAULT_DEBOUNCE_MS, DEFAULT_LATENCY_MS, PriceSourceKind};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Backing used to value tokens against each other.
    #[clap(long, value_enum, default_value_t = PriceSourceKind::UsdTable)]
    pub price_source: PriceSourceKind,

    /// Quiet period after the last edit before a quote is requested.
    #[clap(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Simulated round trip of a quote fetch.
    #[clap(long, default_value_t = DEFAULT_LATENCY_MS)]
    pub latency_ms: u64,

    /// Random extra latency added on top of `--latency-ms`.
    #[clap(long, default_value_t = 0)]
    pub jitter_ms: u64,

    /// Path to a JSON token list. The built-in tokens are used when omitted.
    #[clap(long)]
    pub tokens: Option<String>,

    /// Start with the wallet connected.
    #[clap(long)]
    pub connected: bool,

    /// Print every quote state as a JSON line on stdout.
    #[clap(long)]
    pub json: bool,
}
