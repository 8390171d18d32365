//! Token metadata and the registry used to resolve symbols.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;

use crate::error::SwapError;
use crate::result::Result;

/// Trait providing file parsing for token lists.
pub trait TokenListParser: Sized {
    /// Parses a token list from a buffered reader.
    ///
    /// The input is a JSON array of token objects. Returns an error if the JSON
    /// is malformed, empty, or violates the registry invariants.
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Self>;
}

/// A swappable token as shown in the token picker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Unique ticker symbol, e.g. `ETH`.
    pub symbol: String,
    /// Human readable name.
    pub name: String,
    /// On-chain decimal precision.
    pub decimals: u8,
    /// Reference valuation (USD unless the price source says otherwise).
    #[serde(alias = "mockUsdPrice")]
    pub reference_price: Decimal,
    /// Icon background used by front-ends.
    pub color: String,
}

impl Token {
    /// Creates a new token description.
    pub fn new(symbol: &str, name: &str, decimals: u8, reference_price: Decimal, color: &str) -> Self {
        Token {
            symbol: String::from(symbol),
            name: String::from(name),
            decimals,
            reference_price,
            color: String::from(color),
        }
    }
}

/// Ordered, immutable set of tokens keyed by symbol.
///
/// Built once and shared (usually behind an `Arc`); there is no global instance,
/// so tests can inject registries with synthetic prices.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    index: HashMap<String, usize>,
}

impl TokenRegistry {
    /// Builds a registry, keeping the given order.
    ///
    /// Fails on duplicate symbols or non-positive reference prices.
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tokens.len());
        for (position, token) in tokens.iter().enumerate() {
            if token.reference_price <= Decimal::ZERO {
                return Err(SwapError::InvalidPrice {
                    symbol: token.symbol.clone(),
                });
            }
            if index.insert(token.symbol.clone(), position).is_some() {
                return Err(SwapError::DuplicateToken(token.symbol.clone()));
            }
        }
        Ok(Self { tokens, index })
    }

    /// All tokens in display order.
    pub fn list_tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Looks a token up by its exact symbol.
    pub fn get_token_by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.index.get(symbol).map(|&position| &self.tokens[position])
    }

    /// Like [`Self::get_token_by_symbol`] but fails with [`SwapError::InvalidToken`].
    pub fn resolve(&self, symbol: &str) -> Result<&Token> {
        self.get_token_by_symbol(symbol)
            .ok_or_else(|| SwapError::InvalidToken(String::from(symbol)))
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when no tokens are registered.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenRegistry {
    /// The reference token set with mock USD prices.
    fn default() -> Self {
        let tokens = vec![
            Token::new("ETH", "Ethereum", 18, Decimal::from(2500), "bg-blue-500"),
            Token::new("WBTC", "Wrapped Bitcoin", 8, Decimal::from(45000), "bg-orange-500"),
            Token::new("USDC", "USD Coin", 6, Decimal::ONE, "bg-blue-400"),
            Token::new("USDT", "Tether USD", 6, Decimal::ONE, "bg-teal-500"),
            Token::new("DAI", "Dai Stablecoin", 18, Decimal::ONE, "bg-yellow-500"),
        ];
        let index = tokens
            .iter()
            .enumerate()
            .map(|(position, token)| (token.symbol.clone(), position))
            .collect();
        Self { tokens, index }
    }
}

impl TokenListParser for TokenRegistry {
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let tokens: Vec<Token> = serde_json::from_reader(reader)?;
        if tokens.is_empty() {
            return Err(SwapError::ParseTokenList(String::from(
                "token list contains no tokens",
            )));
        }
        TokenRegistry::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_registry_keeps_display_order() {
        let registry = TokenRegistry::default();
        let symbols: Vec<&str> = registry
            .list_tokens()
            .iter()
            .map(|t| t.symbol.as_str())
            .collect();
        assert_eq!(symbols, ["ETH", "WBTC", "USDC", "USDT", "DAI"]);
        assert_eq!(
            registry.get_token_by_symbol("WBTC").map(|t| t.reference_price),
            Some(dec!(45000))
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = TokenRegistry::default();
        assert!(registry.get_token_by_symbol("eth").is_none());
        assert!(matches!(registry.resolve("XYZ"), Err(SwapError::InvalidToken(s)) if s == "XYZ"));
    }

    #[test]
    fn rejects_duplicates_and_bad_prices() {
        let dup = TokenRegistry::new(vec![
            Token::new("AAA", "A", 18, dec!(1), "c"),
            Token::new("AAA", "A again", 18, dec!(2), "c"),
        ]);
        assert!(matches!(dup, Err(SwapError::DuplicateToken(_))));

        let zero = TokenRegistry::new(vec![Token::new("ZRO", "Zero", 18, dec!(0), "c")]);
        assert!(matches!(zero, Err(SwapError::InvalidPrice { .. })));
    }

    #[test]
    fn parses_token_list_json() {
        let json = r#"[
            {"symbol": "AAA", "name": "Alpha", "decimals": 18, "referencePrice": "12.5", "color": "bg-red-500"},
            {"symbol": "BBB", "name": "Beta", "decimals": 6, "mockUsdPrice": 2, "color": "bg-green-500"}
        ]"#;
        let registry = TokenRegistry::parse_from_reader(json.as_bytes()).expect("valid list");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("AAA").map(|t| t.reference_price).ok(), Some(dec!(12.5)));
        assert_eq!(registry.resolve("BBB").map(|t| t.decimals).ok(), Some(6));
    }

    #[test]
    fn empty_token_list_is_rejected() {
        let result = TokenRegistry::parse_from_reader("[]".as_bytes());
        assert!(matches!(result, Err(SwapError::ParseTokenList(_))));
    }
}
