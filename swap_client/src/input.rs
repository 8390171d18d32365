//! Line-based input for the swap form.
//!
//! Each stdin line is one edit, e.g. `amount 1.5`, `sell WBTC`, `flip`. A bare
//! number is shorthand for `amount <number>`.
use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error};
use std::io::{self, BufRead};
use std::thread;
use strum_macros::{Display, EnumString};
use swap_common::{Result, SwapError};

/// Which half of the form a token selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    /// The token being paid.
    Sell,
    /// The token being received.
    Buy,
}

/// An edit or action typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Amount(String),
    Select(Side, String),
    Flip,
    Tokens,
    Connect,
    Disconnect,
    Refresh,
    Help,
    Quit,
}

/// Usage text printed by `help`.
pub const HELP: &str = "commands: amount <x> | <x> | sell <SYM> | buy <SYM> | flip | tokens | connect | disconnect | refresh | help | quit";

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<FormCommand> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(SwapError::InvalidCommand(String::from("empty line")));
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(SwapError::InvalidCommand(format!("too many arguments: {}", line.trim())));
    }

    let command = match (head.to_ascii_lowercase().as_str(), arg) {
        ("amount", Some(value)) => FormCommand::Amount(String::from(value)),
        // Clearing the amount is a valid edit.
        ("amount", None) => FormCommand::Amount(String::new()),
        ("sell" | "buy", Some(symbol)) => {
            let side = head
                .parse::<Side>()
                .map_err(|e| SwapError::InvalidCommand(e.to_string()))?;
            FormCommand::Select(side, symbol.to_ascii_uppercase())
        }
        ("flip", None) => FormCommand::Flip,
        ("tokens", None) => FormCommand::Tokens,
        ("connect", None) => FormCommand::Connect,
        ("disconnect", None) => FormCommand::Disconnect,
        ("refresh", None) => FormCommand::Refresh,
        ("help", None) => FormCommand::Help,
        ("quit" | "exit", None) => FormCommand::Quit,
        (_, None) if head.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            FormCommand::Amount(String::from(head))
        }
        _ => return Err(SwapError::InvalidCommand(String::from(line.trim()))),
    };
    Ok(command)
}

/// Reads stdin on a background thread and forwards each line.
///
/// The channel disconnects when stdin reaches EOF.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Read stdin error: {}", e);
                    break;
                }
            }
        }
        debug!("stdin closed");
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edits() {
        assert_eq!(parse_command("amount 1.5").ok(), Some(FormCommand::Amount(String::from("1.5"))));
        assert_eq!(parse_command("  2500 ").ok(), Some(FormCommand::Amount(String::from("2500"))));
        assert_eq!(parse_command("amount").ok(), Some(FormCommand::Amount(String::new())));
        assert_eq!(
            parse_command("Buy wbtc").ok(),
            Some(FormCommand::Select(Side::Buy, String::from("WBTC")))
        );
        assert_eq!(parse_command("FLIP").ok(), Some(FormCommand::Flip));
        assert_eq!(parse_command("exit").ok(), Some(FormCommand::Quit));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_command(""), Err(SwapError::InvalidCommand(_))));
        assert!(matches!(parse_command("sell"), Err(SwapError::InvalidCommand(_))));
        assert!(matches!(parse_command("flip now"), Err(SwapError::InvalidCommand(_))));
        assert!(matches!(parse_command("amount 1 2"), Err(SwapError::InvalidCommand(_))));
        assert!(matches!(parse_command("launch"), Err(SwapError::InvalidCommand(_))));
    }
}
