//! Quote engine: turns a request into a formatted output amount.
//!
//! The engine is stateless apart from its injected registry and price source.
//! It resolves both symbols before touching the price source, applies the fixed
//! fee factor, and formats the result to [`QUOTE_DECIMALS`] places.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::Arc;
use swap_common::settings::{QUOTE_DECIMALS, fee_factor};
use swap_common::{QuoteRequest, Result, SwapError, Token, TokenRegistry, TradeType};

use crate::model::price_source::PriceSource;

/// Output of a single engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResult {
    /// Formatted amount (`token_out` for exact input, `token_in` for exact output).
    pub amount_out: String,
    /// Generation of the request that produced this result.
    pub generation: u64,
    /// UTC timestamp in milliseconds since Unix epoch.
    pub quoted_at: i64,
}

/// Parses user input into a positive decimal.
///
/// Returns `Ok(None)` for empty, non-numeric, zero and negative input; callers
/// treat all of these as "no amount". Only plain decimal and scientific
/// notation is numeric (no digit separators). A positive number that `Decimal`
/// cannot represent fails with [`SwapError::Arithmetic`].
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>> {
    let Some(literal) = decimal_literal(raw.trim()) else {
        return Ok(None);
    };
    if literal.negative || !literal.mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
        return Ok(None);
    }
    let value = match literal.exponent {
        None => Decimal::from_str(&literal.mantissa),
        Some(exponent) => Decimal::from_scientific(&format!("{}e{}", literal.mantissa, exponent)),
    }
    .map_err(|_| SwapError::Arithmetic("amount out of range"))?;
    if value <= Decimal::ZERO {
        return Err(SwapError::Arithmetic("amount out of range"));
    }
    Ok(Some(value))
}

/// A syntactically valid number, split and normalized for `Decimal`.
struct DecimalLiteral<'a> {
    negative: bool,
    /// `int` or `int.frac`, never with a bare leading or trailing dot.
    mantissa: String,
    exponent: Option<&'a str>,
}

/// Accepts `[+-]digits[.digits][(e|E)[+-]digits]` with at least one mantissa digit.
fn decimal_literal(s: &str) -> Option<DecimalLiteral<'_>> {
    let negative = s.starts_with('-');
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !digits_only(int_part) || !digits_only(frac_part) {
        return None;
    }
    let exponent = match exponent {
        Some(e) => {
            let e = e.strip_prefix('+').unwrap_or(e);
            let magnitude = e.strip_prefix('-').unwrap_or(e);
            if magnitude.is_empty() || !digits_only(magnitude) {
                return None;
            }
            Some(e)
        }
        None => None,
    };
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let mantissa = if frac_part.is_empty() {
        String::from(int_part)
    } else {
        format!("{}.{}", int_part, frac_part)
    };
    Some(DecimalLiteral {
        negative,
        mantissa,
        exponent,
    })
}

/// Computes quotes against a registry and a price source.
pub struct QuoteEngine {
    registry: Arc<TokenRegistry>,
    source: Arc<dyn PriceSource>,
    fee_factor: Decimal,
}

impl QuoteEngine {
    /// Creates an engine with the default 0.1% fee.
    pub fn new(registry: Arc<TokenRegistry>, source: Arc<dyn PriceSource>) -> Self {
        Self {
            registry,
            source,
            fee_factor: fee_factor(),
        }
    }

    /// Overrides the multiplicative fee factor.
    pub fn with_fee_factor(mut self, fee_factor: Decimal) -> Self {
        self.fee_factor = fee_factor;
        self
    }

    /// Registry used to resolve symbols.
    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Name of the backing price source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Resolves, validates and prices a request.
    ///
    /// Unknown symbols fail with [`SwapError::InvalidToken`] before the price
    /// source is consulted.
    pub fn quote(&self, request: &QuoteRequest, generation: u64) -> Result<QuoteResult> {
        let token_in = self.registry.resolve(&request.token_in)?;
        let token_out = self.registry.resolve(&request.token_out)?;
        let amount = parse_amount(&request.amount)?
            .ok_or_else(|| SwapError::InvalidAmount(request.amount.clone()))?;

        let amount_out = self.compute_quote(token_in, token_out, amount, request.trade_type)?;
        Ok(QuoteResult {
            amount_out,
            generation,
            quoted_at: Utc::now().timestamp_millis(),
        })
    }

    /// Prices `amount` for an already-resolved pair.
    ///
    /// For [`TradeType::ExactInput`] `amount` is sold and the result is the
    /// amount of `token_out` received. For [`TradeType::ExactOutput`] `amount`
    /// is the `token_out` wanted and the result is the `token_in` required,
    /// rounded up so the quote never understates the cost.
    pub fn compute_quote(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount: Decimal,
        trade_type: TradeType,
    ) -> Result<String> {
        if amount <= Decimal::ZERO {
            return Err(SwapError::InvalidAmount(amount.to_string()));
        }
        let quoted = match trade_type {
            TradeType::ExactInput => self
                .source
                .convert(token_in, token_out, amount)?
                .checked_mul(self.fee_factor)
                .ok_or(SwapError::Arithmetic("fee overflow"))?
                .round_dp_with_strategy(QUOTE_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
            TradeType::ExactOutput => self
                .source
                .convert(token_out, token_in, amount)?
                .checked_div(self.fee_factor)
                .ok_or(SwapError::Arithmetic("zero fee factor"))?
                .round_dp_with_strategy(QUOTE_DECIMALS, RoundingStrategy::AwayFromZero),
        };
        Ok(format!("{:.*}", QUOTE_DECIMALS as usize, quoted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::price_source::{FixedRateTable, UsdPriceTable};
    use rust_decimal_macros::dec;

    fn engine() -> QuoteEngine {
        let registry = Arc::new(TokenRegistry::default());
        let source = Arc::new(UsdPriceTable::from_registry(&registry));
        QuoteEngine::new(registry, source)
    }

    #[test]
    fn parse_amount_accepts_only_positive_decimals() {
        assert_eq!(parse_amount(" 1.5 ").ok(), Some(Some(dec!(1.5))));
        assert_eq!(parse_amount("1e3").ok(), Some(Some(dec!(1000))));
        assert_eq!(parse_amount(".5").ok(), Some(Some(dec!(0.5))));
        assert_eq!(parse_amount("2.5E+2").ok(), Some(Some(dec!(250))));
        assert_eq!(parse_amount("+2.").ok(), Some(Some(dec!(2))));
        for empty in ["", "0", "0.000", "0e50", "-2", "-1e30", "abc", ".", "1e", "1_000", "1,5"] {
            assert_eq!(parse_amount(empty).ok(), Some(None), "input {:?}", empty);
        }
    }

    #[test]
    fn out_of_range_amounts_are_errors() {
        for huge in ["1e30", "99999999999999999999999999999999"] {
            assert!(
                matches!(parse_amount(huge), Err(SwapError::Arithmetic(_))),
                "input {:?}",
                huge
            );
        }
        let result = engine().quote(&QuoteRequest::exact_input("ETH", "USDC", "1e30"), 1);
        assert!(matches!(result, Err(SwapError::Arithmetic(_))));
    }

    #[test]
    fn eth_to_usdc_applies_fee() {
        let result = engine().quote(&QuoteRequest::exact_input("ETH", "USDC", "1"), 1);
        assert_eq!(result.map(|r| r.amount_out).ok().as_deref(), Some("2497.500000"));
    }

    #[test]
    fn usdc_to_eth_applies_fee() {
        let result = engine().quote(&QuoteRequest::exact_input("USDC", "ETH", "2500"), 1);
        assert_eq!(result.map(|r| r.amount_out).ok().as_deref(), Some("0.999000"));
    }

    #[test]
    fn rounds_half_away_from_zero_at_sixth_digit() {
        let registry = Arc::new(TokenRegistry::default());
        let source = Arc::new(
            UsdPriceTable::default()
                .with_price("ETH", dec!(1))
                .and_then(|t| t.with_price("USDC", dec!(1)))
                .expect("positive prices"),
        );
        let engine = QuoteEngine::new(registry, source).with_fee_factor(dec!(1));
        let eth = engine.registry().resolve("ETH").expect("registered").clone();
        let usdc = engine.registry().resolve("USDC").expect("registered").clone();
        let up = engine.compute_quote(&eth, &usdc, dec!(0.0000005), TradeType::ExactInput);
        assert_eq!(up.ok().as_deref(), Some("0.000001"));
        let down = engine.compute_quote(&eth, &usdc, dec!(0.0000004999), TradeType::ExactInput);
        assert_eq!(down.ok().as_deref(), Some("0.000000"));
    }

    #[test]
    fn unknown_symbol_is_invalid_token() {
        let result = engine().quote(&QuoteRequest::exact_input("XYZ", "USDC", "1"), 1);
        assert!(matches!(result, Err(SwapError::InvalidToken(s)) if s == "XYZ"));
    }

    #[test]
    fn exact_output_prices_required_input() {
        let result = engine().quote(
            &QuoteRequest::new("USDC", "ETH", "0.999", TradeType::ExactOutput),
            1,
        );
        assert_eq!(result.map(|r| r.amount_out).ok().as_deref(), Some("2500.000000"));

        let rounded_up = engine().quote(
            &QuoteRequest::new("ETH", "USDC", "1", TradeType::ExactOutput),
            1,
        );
        // 1 / 2500 / 0.999 = 0.00040040040...
        assert_eq!(rounded_up.map(|r| r.amount_out).ok().as_deref(), Some("0.000401"));
    }

    #[test]
    fn fixed_rate_backing_matches_reference_rate() {
        let registry = Arc::new(TokenRegistry::default());
        let engine = QuoteEngine::new(registry, Arc::new(FixedRateTable::reference()));
        let result = engine.quote(&QuoteRequest::exact_input("ETH", "USDC", "1"), 7);
        let result = result.expect("pair is configured");
        assert_eq!(result.amount_out, "2497.500000");
        assert_eq!(result.generation, 7);

        let missing = engine.quote(&QuoteRequest::exact_input("WBTC", "DAI", "1"), 8);
        assert!(matches!(missing, Err(SwapError::UnsupportedPair { .. })));
    }
}
