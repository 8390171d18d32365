//! Headless swap form: what the widget shows, minus the pixels.

use swap_common::QuoteRequest;
use swap_quoter::QuoteState;

use crate::input::Side;
use crate::model::wallet::WalletConnection;

/// Sell/buy selections and the two amount fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapForm {
    sell_token: String,
    buy_token: String,
    sell_amount: String,
    buy_amount: String,
}

impl Default for SwapForm {
    fn default() -> Self {
        Self::new("ETH", "USDC")
    }
}

impl SwapForm {
    pub fn new(sell_token: &str, buy_token: &str) -> Self {
        Self {
            sell_token: String::from(sell_token),
            buy_token: String::from(buy_token),
            sell_amount: String::new(),
            buy_amount: String::new(),
        }
    }

    pub fn sell_token(&self) -> &str {
        &self.sell_token
    }

    pub fn buy_token(&self) -> &str {
        &self.buy_token
    }

    pub fn sell_amount(&self) -> &str {
        &self.sell_amount
    }

    pub fn buy_amount(&self) -> &str {
        &self.buy_amount
    }

    pub fn set_sell_amount(&mut self, amount: &str) {
        self.sell_amount = String::from(amount.trim());
    }

    /// Picks a token for one side. Picking the token already on the other side
    /// swaps the two selections.
    pub fn select_token(&mut self, side: Side, symbol: &str) {
        match side {
            Side::Sell => {
                if symbol == self.buy_token {
                    self.buy_token = self.sell_token.clone();
                }
                self.sell_token = String::from(symbol);
            }
            Side::Buy => {
                if symbol == self.sell_token {
                    self.sell_token = self.buy_token.clone();
                }
                self.buy_token = String::from(symbol);
            }
        }
    }

    /// Flips the pair; the received amount becomes the new amount to sell.
    pub fn switch_tokens(&mut self) {
        std::mem::swap(&mut self.sell_token, &mut self.buy_token);
        self.sell_amount = std::mem::take(&mut self.buy_amount);
    }

    /// Mirrors the latest quote into the receive field.
    pub fn apply_quote(&mut self, state: &QuoteState) {
        if !state.quote_amount.is_empty() {
            self.buy_amount = state.quote_amount.clone();
        } else if self.sell_amount.is_empty() {
            self.buy_amount.clear();
        }
    }

    /// The request the current inputs describe.
    pub fn request(&self) -> QuoteRequest {
        QuoteRequest::exact_input(&self.sell_token, &self.buy_token, &self.sell_amount)
    }

    /// Hint shown under the receive field.
    pub fn status_line(state: &QuoteState) -> &'static str {
        if state.loading {
            "Fetching best price..."
        } else if state.error.is_some() {
            "Error fetching price"
        } else {
            ""
        }
    }

    /// Label of the main action button.
    pub fn action_label(wallet: &impl WalletConnection, state: &QuoteState) -> &'static str {
        if !wallet.is_connected() {
            "Connect Wallet"
        } else if state.loading {
            "Calculated..."
        } else {
            "Swap"
        }
    }
}
