//! State held by the client between input lines.
//!
//! - `swap_form` — sell/buy selections and amounts, mirrored from quote updates.
//! - `wallet` — the connection stub deciding between "Connect Wallet" and "Swap".
pub mod swap_form;
pub mod wallet;
