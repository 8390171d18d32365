//! Debounced, race-free quote controller.
//!
//! The controller owns a single background thread that is the only writer of
//! [`QuoteState`] and of the generation counter. Callers talk to it through a
//! `crossbeam_channel` command queue:
//!
//! - `update(request)` — a new input tuple. Every update bumps the generation.
//!   Empty, zero or non-numeric amounts clear the state immediately and cancel
//!   any pending debounce; anything else (re)arms the debounce deadline, including
//!   numbers too large to price, which fail in the engine.
//! - `refresh()` — re-submits the last request through the same path.
//! - `subscribe()` — registers a channel that receives every state change.
//!
//! Event loop:
//! - Crossbeam `select!` multiplexes commands, the debounce deadline
//!   (`crossbeam_channel::at`, or `never()` when nothing is pending) and engine
//!   completions.
//! - When the deadline fires the state switches to `loading` and the engine runs
//!   on a short-lived worker thread, so a slow price source never blocks input
//!   handling.
//! - Each completion carries the generation it was started for. Only a
//!   completion whose generation is still current is applied; anything older is
//!   dropped without touching `loading`, `quote_amount` or `error`.
//!
//! Errors never escape the controller: they are logged and folded into
//! `QuoteState::error`.

use crossbeam_channel::{Receiver, Sender, at, never, select, unbounded};
use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use swap_common::{QuoteRequest, Result, SwapError};

use crate::model::engine::{QuoteEngine, QuoteResult, parse_amount};
use crate::model::state::{QuoteErrorKind, QuoteState};

/// Message accepted by the controller thread.
enum ControlMessage {
    Update(QuoteRequest),
    Refresh,
    Subscribe(Sender<QuoteState>),
    Shutdown,
}

/// Engine outcome tagged with the generation it was computed for.
struct Completion {
    generation: u64,
    outcome: Result<QuoteResult>,
}

/// A request waiting for its debounce deadline.
struct Pending {
    request: QuoteRequest,
    generation: u64,
    deadline: Instant,
}

/// Handle to a running quote controller.
///
/// Dropping the handle detaches: the pending debounce is cancelled, the
/// controller thread is joined, and results still in flight are ignored.
pub struct QuoteController {
    commands: Sender<ControlMessage>,
    state: Arc<Mutex<QuoteState>>,
    generation: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl QuoteController {
    /// Starts the controller thread.
    pub fn spawn(engine: Arc<QuoteEngine>, debounce: Duration) -> Result<Self> {
        let (commands_tx, commands_rx) = unbounded::<ControlMessage>();
        let state = Arc::new(Mutex::new(QuoteState::default()));
        let generation = Arc::new(AtomicU64::new(0));

        let worker_loop = ControllerLoop {
            engine,
            debounce,
            state: QuoteState::default(),
            shared_state: Arc::clone(&state),
            generation: 0,
            shared_generation: Arc::clone(&generation),
            pending: None,
            last_request: None,
            subscribers: Vec::new(),
        };
        let worker = thread::Builder::new()
            .name(String::from("quote-controller"))
            .spawn(move || worker_loop.run(commands_rx))?;

        Ok(Self {
            commands: commands_tx,
            state,
            generation,
            worker: Some(worker),
        })
    }

    /// Submits a new input tuple.
    pub fn update(&self, request: QuoteRequest) -> Result<()> {
        self.send(ControlMessage::Update(request))
    }

    /// Re-submits the last request, forcing a fresh quote after the debounce.
    pub fn refresh(&self) -> Result<()> {
        self.send(ControlMessage::Refresh)
    }

    /// Returns a channel that receives every subsequent state change.
    pub fn subscribe(&self) -> Result<Receiver<QuoteState>> {
        let (tx, rx) = unbounded::<QuoteState>();
        self.send(ControlMessage::Subscribe(tx))?;
        Ok(rx)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Result<QuoteState> {
        Ok(self.state.lock()?.clone())
    }

    /// Number of input changes processed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stops the controller and waits for its thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, message: ControlMessage) -> Result<()> {
        self.commands
            .send(message)
            .map_err(|_| SwapError::ChannelSend(String::from("quote controller has stopped")))
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.commands.send(ControlMessage::Shutdown);
            if worker.join().is_err() {
                error!("Quote controller thread panicked");
            }
        }
    }
}

impl Drop for QuoteController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State owned by the controller thread.
struct ControllerLoop {
    engine: Arc<QuoteEngine>,
    debounce: Duration,
    state: QuoteState,
    shared_state: Arc<Mutex<QuoteState>>,
    generation: u64,
    shared_generation: Arc<AtomicU64>,
    pending: Option<Pending>,
    last_request: Option<QuoteRequest>,
    subscribers: Vec<Sender<QuoteState>>,
}

impl ControllerLoop {
    fn run(mut self, commands: Receiver<ControlMessage>) {
        let (done_tx, done_rx) = unbounded::<Completion>();
        info!(
            "Quote controller started (source: {}, debounce: {:?})",
            self.engine.source_name(),
            self.debounce
        );

        loop {
            let timer = match &self.pending {
                Some(pending) => at(pending.deadline),
                None => never(),
            };

            select! {
                recv(commands) -> msg => match msg {
                    Ok(ControlMessage::Update(request)) => self.on_input(request),
                    Ok(ControlMessage::Refresh) => match self.last_request.clone() {
                        Some(request) => self.on_input(request),
                        None => debug!("Refresh ignored: no request submitted yet"),
                    },
                    Ok(ControlMessage::Subscribe(tx)) => self.subscribers.push(tx),
                    Ok(ControlMessage::Shutdown) | Err(_) => break,
                },
                recv(timer) -> _ => self.fire(&done_tx),
                recv(done_rx) -> msg => if let Ok(completion) = msg {
                    self.on_completion(completion);
                },
            }
        }

        if self.pending.take().is_some() {
            debug!("Pending debounce cancelled on shutdown");
        }
        info!("Quote controller stopping...");
    }

    fn on_input(&mut self, request: QuoteRequest) {
        self.generation += 1;
        self.shared_generation.store(self.generation, Ordering::SeqCst);
        self.last_request = Some(request.clone());

        if let Ok(None) = parse_amount(&request.amount) {
            if let Some(cancelled) = self.pending.take() {
                debug!("Debounce for generation {} cancelled", cancelled.generation);
            }
            self.publish(QuoteState::default());
            return;
        }

        if let Some(superseded) = self.pending.take() {
            debug!(
                "Generation {} superseded by {} before debounce elapsed",
                superseded.generation, self.generation
            );
        }
        self.pending = Some(Pending {
            request,
            generation: self.generation,
            deadline: Instant::now() + self.debounce,
        });
    }

    fn fire(&mut self, done_tx: &Sender<Completion>) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug!(
            "Fetching quote for generation {}: {} {} -> {} ({})",
            pending.generation,
            pending.request.amount,
            pending.request.token_in,
            pending.request.token_out,
            pending.request.trade_type
        );
        self.publish(QuoteState {
            quote_amount: self.state.quote_amount.clone(),
            loading: true,
            error: None,
        });

        let engine = Arc::clone(&self.engine);
        let done = done_tx.clone();
        let Pending {
            request,
            generation,
            ..
        } = pending;
        let spawned = thread::Builder::new()
            .name(format!("quote-fetch-{}", generation))
            .spawn(move || {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| engine.quote(&request, generation)))
                        .unwrap_or_else(|_| {
                            Err(SwapError::Internal(String::from("quote computation panicked")))
                        });
                // The controller may already be gone; nothing left to notify.
                let _ = done.send(Completion { generation, outcome });
            });

        if let Err(e) = spawned {
            self.on_completion(Completion {
                generation,
                outcome: Err(SwapError::Io(e)),
            });
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        if completion.generation != self.generation {
            debug!(
                "Discarding stale quote for generation {} (current {})",
                completion.generation, self.generation
            );
            return;
        }

        match completion.outcome {
            Ok(result) => {
                debug!(
                    "Quote for generation {} settled at {}",
                    result.generation, result.quoted_at
                );
                self.publish(QuoteState {
                    quote_amount: result.amount_out,
                    loading: false,
                    error: None,
                });
            }
            Err(e) => {
                error!("Quote fetch error: {}", e);
                self.publish(QuoteState {
                    quote_amount: String::new(),
                    loading: false,
                    error: Some(QuoteErrorKind::from(&e)),
                });
            }
        }
    }

    fn publish(&mut self, next: QuoteState) {
        if next == self.state {
            return;
        }
        self.state = next;

        match self.shared_state.lock() {
            Ok(mut shared) => *shared = self.state.clone(),
            Err(e) => warn!("Quote state snapshot unavailable: {}", e),
        }

        let state = &self.state;
        self.subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
    }
}
