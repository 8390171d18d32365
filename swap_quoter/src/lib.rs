//! Swap quote engine and controller.
//!
//! The crate is split into two layers:
//!
//! - `model` — the stateless side: the `PriceSource` strategy with its static
//!   backings, the `QuoteEngine` that applies fees and formatting, and the
//!   `QuoteState` that callers render.
//! - `controller` — the stateful side: `QuoteController` debounces input
//!   changes, runs the engine off-thread, tags every request with a generation
//!   number and drops completions that a newer input has superseded.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use swap_common::{QuoteRequest, TokenRegistry};
//! use swap_common::settings::PriceSourceKind;
//! use swap_quoter::{QuoteController, QuoteEngine, build_price_source};
//!
//! let registry = Arc::new(TokenRegistry::default());
//! let source = build_price_source(
//!     PriceSourceKind::UsdTable,
//!     &registry,
//!     Duration::from_millis(600),
//!     Duration::ZERO,
//! );
//! let engine = Arc::new(QuoteEngine::new(registry, source));
//! let controller = QuoteController::spawn(engine, Duration::from_millis(500))?;
//! let updates = controller.subscribe()?;
//! controller.update(QuoteRequest::exact_input("ETH", "USDC", "1"))?;
//! let _loading = updates.recv();
//! let settled = updates.recv();
//! # Ok::<(), swap_common::SwapError>(())
//! ```
#![warn(missing_docs)]
pub mod controller;
pub mod model;

pub use controller::QuoteController;
pub use model::engine::{QuoteEngine, QuoteResult, parse_amount};
pub use model::price_source::{
    FixedRateTable, PriceSource, SimulatedLatency, UsdPriceTable, build_price_source,
};
pub use model::state::{QuoteErrorKind, QuotePhase, QuoteState};
