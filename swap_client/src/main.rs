//! Swap Client — an interactive terminal front-end for the swap quote engine.
//!
//! It keeps a headless swap form (sell/buy tokens and amounts), feeds every
//! edit to a `QuoteController`, and renders each quote state change: the
//! receive amount, the "Fetching best price..." hint, and the action label
//! ("Connect Wallet" / "Calculated..." / "Swap").
//!
//! Usage example (CLI):
//! ```bash
//! printf 'amount 1\nbuy WBTC\nflip\n' | swap_client --price-source usd-table --connected
//! ```
//!
//! Input is one command per line; see `input::HELP`.
#![warn(missing_docs)]
mod args;
mod input;
mod model;

use crate::args::Args;
use crate::input::{FormCommand, HELP, parse_command, spawn_stdin_reader};
use crate::model::swap_form::SwapForm;
use crate::model::wallet::Wallet;
use clap::Parser;
use crossbeam_channel::{at, bounded, never, select};
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use swap_common::Result;
use swap_common::SwapError;
use swap_common::TokenRegistry;
use swap_common::tokens::TokenListParser;
use swap_quoter::{QuoteController, QuoteEngine, QuoteState, build_price_source};

/// Extra time granted after stdin closes so the last edit can still settle.
const LINGER_MARGIN_MS: u64 = 200;

fn main() -> Result<(), SwapError> {
    init_logger();
    let args = Args::parse();

    let registry = Arc::new(load_registry(args.tokens.as_deref())?);
    info!("Tokens: {}", token_symbols(&registry));

    let latency = Duration::from_millis(args.latency_ms);
    let jitter = Duration::from_millis(args.jitter_ms);
    let debounce = Duration::from_millis(args.debounce_ms);
    let source = build_price_source(args.price_source, &registry, latency, jitter);
    let engine = Arc::new(QuoteEngine::new(Arc::clone(&registry), source));
    let controller = QuoteController::spawn(engine, debounce)?;
    let updates = controller.subscribe()?;

    let (stop_tx, stop_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = stop_tx.try_send(());
    })
    .expect("Error setting Ctrl+C handler");

    let stdin_lines = spawn_stdin_reader();
    let mut input_open = true;
    let mut linger_deadline: Option<Instant> = None;
    let mut form = SwapForm::default();
    let mut wallet = Wallet::new(args.connected);
    let mut state = controller.snapshot()?;

    info!("{}", HELP);
    emit(render(&form, &wallet, &state, args.json, RenderCause::Start)?, args.json);

    loop {
        let lines = if input_open { stdin_lines.clone() } else { never() };
        let linger = match linger_deadline {
            Some(deadline) => at(deadline),
            None => never(),
        };

        select! {
            recv(lines) -> line => match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match parse_command(&line) {
                    Ok(FormCommand::Quit) => break,
                    Ok(command) => {
                        if apply_command(command, &registry, &mut form, &mut wallet, &controller)? {
                            controller.update(form.request())?;
                        }
                        emit(render(&form, &wallet, &state, args.json, RenderCause::Command)?, args.json);
                    }
                    Err(e) => warn!("{} ({})", e, HELP),
                },
                Err(_) => {
                    debug!("Input closed; waiting for the last quote");
                    input_open = false;
                    let margin = Duration::from_millis(LINGER_MARGIN_MS);
                    linger_deadline = Some(Instant::now() + debounce + latency + jitter + margin);
                }
            },
            recv(updates) -> msg => match msg {
                Ok(next) => {
                    state = next;
                    form.apply_quote(&state);
                    emit(render(&form, &wallet, &state, args.json, RenderCause::Update)?, args.json);
                }
                Err(_) => break,
            },
            recv(linger) -> _ => break,
            recv(stop_rx) -> _ => break,
        }
    }

    controller.shutdown();
    info!("Client stopped.");
    Ok(())
}

/// Applies one command to the form. Returns `true` when the quote inputs changed.
fn apply_command(
    command: FormCommand,
    registry: &TokenRegistry,
    form: &mut SwapForm,
    wallet: &mut Wallet,
    controller: &QuoteController,
) -> Result<bool> {
    let changed = match command {
        FormCommand::Amount(amount) => {
            form.set_sell_amount(&amount);
            true
        }
        FormCommand::Select(side, symbol) => {
            if registry.get_token_by_symbol(&symbol).is_none() {
                warn!("Unknown token {}; available: {}", symbol, token_symbols(registry));
                false
            } else {
                form.select_token(side, &symbol);
                true
            }
        }
        FormCommand::Flip => {
            form.switch_tokens();
            true
        }
        FormCommand::Tokens => {
            for token in registry.list_tokens() {
                info!(
                    "{:<6} {:<18} decimals={:<2} price={} ({})",
                    token.symbol, token.name, token.decimals, token.reference_price, token.color
                );
            }
            false
        }
        FormCommand::Connect => {
            wallet.connect();
            false
        }
        FormCommand::Disconnect => {
            wallet.disconnect();
            false
        }
        FormCommand::Refresh => {
            controller.refresh()?;
            false
        }
        FormCommand::Help => {
            info!("{}", HELP);
            false
        }
        FormCommand::Quit => false,
    };
    Ok(changed)
}

/// What prompted a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderCause {
    Start,
    Command,
    Update,
}

/// Builds the line to print, if any.
///
/// JSON output is a stream of quote states, so it only follows state updates.
fn render(
    form: &SwapForm,
    wallet: &Wallet,
    state: &QuoteState,
    json: bool,
    cause: RenderCause,
) -> Result<Option<String>> {
    if json {
        if cause != RenderCause::Update {
            return Ok(None);
        }
        return Ok(Some(serde_json::to_string(state)?));
    }
    Ok(Some(format!(
        "Pay {} {} | Receive {} {} | {} | [{}] {}",
        display_amount(form.sell_amount()),
        form.sell_token(),
        display_amount(form.buy_amount()),
        form.buy_token(),
        state.phase(),
        SwapForm::action_label(wallet, state),
        SwapForm::status_line(state)
    )))
}

fn emit(line: Option<String>, json: bool) {
    match line {
        Some(line) if json => println!("{}", line),
        Some(line) => info!("{}", line),
        None => {}
    }
}

fn display_amount(amount: &str) -> &str {
    if amount.is_empty() { "0.0" } else { amount }
}

fn token_symbols(registry: &TokenRegistry) -> String {
    registry
        .list_tokens()
        .iter()
        .map(|t| t.symbol.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loads the token list from `path`, or the built-in tokens when absent.
fn load_registry(path: Option<&str>) -> Result<TokenRegistry> {
    let Some(raw) = path else {
        return Ok(TokenRegistry::default());
    };
    let file_path = normalize_path(raw);
    if !is_file_exist(&file_path) {
        return Err(SwapError::ParseTokenList(format!(
            "token list not found: {}",
            file_path.display()
        )));
    }
    let file = File::open(&file_path)?;
    TokenRegistry::parse_from_reader(BufReader::new(file))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}
