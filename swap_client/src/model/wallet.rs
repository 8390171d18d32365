//! Wallet connection stub.
//!
//! Only the connection flag matters to the form; account identity and chain
//! selection never reach the quote engine.

/// Anything that can tell whether a wallet is connected.
pub trait WalletConnection {
    /// Returns `true` when an account is connected.
    fn is_connected(&self) -> bool;
}

/// In-memory wallet toggled by the `connect` / `disconnect` commands.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    connected: bool,
}

impl Wallet {
    pub fn new(connected: bool) -> Self {
        Self { connected }
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }
}

impl WalletConnection for Wallet {
    fn is_connected(&self) -> bool {
        self.connected
    }
}
