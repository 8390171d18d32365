//! Price sources: the strategy the quote engine uses to value one token in another.
//!
//! Two static backings are provided:
//! - `UsdPriceTable` — every token has a reference price in a common unit (USD);
//!   converting divides one by the other.
//! - `FixedRateTable` — explicit pairwise rates (e.g. 1 ETH = 2500 USDC); the
//!   inverse direction is derived by division.
//!
//! `SimulatedLatency` wraps either of them and blocks for a configurable round
//! trip before answering, standing in for an RPC or contract read. A live
//! network-backed source would implement the same trait.

use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use swap_common::settings::{FIXED_RATE_BASE, FIXED_RATE_QUOTE, PriceSourceKind, fixed_rate};
use swap_common::{Result, SwapError, Token, TokenRegistry};

/// Converts amounts between tokens.
pub trait PriceSource: Send + Sync {
    /// Returns how much of `to` is worth `amount` of `from`, before fees.
    fn convert(&self, from: &Token, to: &Token, amount: Decimal) -> Result<Decimal>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Per-token static price table.
#[derive(Debug, Clone, Default)]
pub struct UsdPriceTable {
    prices: HashMap<String, Decimal>,
}

impl UsdPriceTable {
    /// Snapshot of the registry's reference prices.
    pub fn from_registry(registry: &TokenRegistry) -> Self {
        let prices = registry
            .list_tokens()
            .iter()
            .map(|t| (t.symbol.clone(), t.reference_price))
            .collect();
        Self { prices }
    }

    /// Adds or replaces one price. Non-positive prices are rejected.
    pub fn with_price(mut self, symbol: &str, price: Decimal) -> Result<Self> {
        if price <= Decimal::ZERO {
            return Err(SwapError::InvalidPrice {
                symbol: String::from(symbol),
            });
        }
        self.prices.insert(String::from(symbol), price);
        Ok(self)
    }

    fn price_of(&self, token: &Token) -> Result<Decimal> {
        self.prices
            .get(&token.symbol)
            .copied()
            .ok_or_else(|| SwapError::InvalidToken(token.symbol.clone()))
    }
}

impl PriceSource for UsdPriceTable {
    fn convert(&self, from: &Token, to: &Token, amount: Decimal) -> Result<Decimal> {
        let value = amount
            .checked_mul(self.price_of(from)?)
            .ok_or(SwapError::Arithmetic("value overflow"))?;
        value
            .checked_div(self.price_of(to)?)
            .ok_or(SwapError::Arithmetic("division by zero price"))
    }

    fn name(&self) -> &str {
        "usd-table"
    }
}

/// Fixed pairwise rate table keyed by `(base, quote)`.
#[derive(Debug, Clone, Default)]
pub struct FixedRateTable {
    rates: HashMap<(String, String), Decimal>,
}

impl FixedRateTable {
    /// Registers `1 base = rate quote`.
    pub fn with_rate(mut self, base: &str, quote: &str, rate: Decimal) -> Result<Self> {
        if rate <= Decimal::ZERO {
            return Err(SwapError::InvalidPrice {
                symbol: format!("{}/{}", base, quote),
            });
        }
        self.rates
            .insert((String::from(base), String::from(quote)), rate);
        Ok(self)
    }

    /// The reference table: 1 ETH = 2500 USDC.
    pub fn reference() -> Self {
        let mut rates = HashMap::new();
        rates.insert(
            (String::from(FIXED_RATE_BASE), String::from(FIXED_RATE_QUOTE)),
            fixed_rate(),
        );
        Self { rates }
    }

    fn lookup(&self, base: &str, quote: &str) -> Option<Decimal> {
        self.rates
            .get(&(String::from(base), String::from(quote)))
            .copied()
    }
}

impl PriceSource for FixedRateTable {
    fn convert(&self, from: &Token, to: &Token, amount: Decimal) -> Result<Decimal> {
        if from.symbol == to.symbol {
            return Ok(amount);
        }
        if let Some(rate) = self.lookup(&from.symbol, &to.symbol) {
            return amount
                .checked_mul(rate)
                .ok_or(SwapError::Arithmetic("value overflow"));
        }
        if let Some(rate) = self.lookup(&to.symbol, &from.symbol) {
            return amount
                .checked_div(rate)
                .ok_or(SwapError::Arithmetic("division by zero rate"));
        }
        Err(SwapError::UnsupportedPair {
            token_in: from.symbol.clone(),
            token_out: to.symbol.clone(),
        })
    }

    fn name(&self) -> &str {
        "fixed-rate"
    }
}

/// Decorator that blocks for `latency` (+ up to `jitter`) before delegating.
#[derive(Debug, Clone)]
pub struct SimulatedLatency<P> {
    inner: P,
    latency: Duration,
    jitter: Duration,
}

impl<P: PriceSource> SimulatedLatency<P> {
    /// Wraps `inner` with a fixed minimum latency.
    pub fn new(inner: P, latency: Duration) -> Self {
        Self {
            inner,
            latency,
            jitter: Duration::ZERO,
        }
    }

    /// Adds a uniformly random extra delay in `[0, jitter]`.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    fn delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.latency;
        }
        let extra = rand::rng().random_range(0..=jitter_ms);
        self.latency + Duration::from_millis(extra)
    }
}

impl<P: PriceSource> PriceSource for SimulatedLatency<P> {
    fn convert(&self, from: &Token, to: &Token, amount: Decimal) -> Result<Decimal> {
        let delay = self.delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.inner.convert(from, to, amount)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Builds the configured backing, wrapped in the simulated round trip.
pub fn build_price_source(
    kind: PriceSourceKind,
    registry: &TokenRegistry,
    latency: Duration,
    jitter: Duration,
) -> Arc<dyn PriceSource> {
    match kind {
        PriceSourceKind::UsdTable => Arc::new(
            SimulatedLatency::new(UsdPriceTable::from_registry(registry), latency)
                .with_jitter(jitter),
        ),
        PriceSourceKind::FixedRate => Arc::new(
            SimulatedLatency::new(FixedRateTable::reference(), latency).with_jitter(jitter),
        ),
    }
}
