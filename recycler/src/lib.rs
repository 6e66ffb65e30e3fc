//! A headless data-and-windowing engine for recycled list views.
//!
//! For a framework-neutral driver that owns the subscription lifecycle, see the
//! `recycler-adapter` crate.
//!
//! The crate has two halves:
//! - [`DataSource`]: an ordered collection with per-item keys that emits a typed [`ListChange`]
//!   to its listeners, synchronously, after every mutation.
//! - [`WindowController`]: subscribes to those changes, repairs the visible window (shifting it
//!   when items are inserted above it), computes the materialization range (visible window ±
//!   margin, clamped) and decides which materialized items must be re-rendered.
//!
//! It is UI-agnostic. A rendering layer is expected to:
//! - report which indexes are actually on screen
//! - render the entries of each render pass, skipping clean entries whose key it already shows
//! - execute the [`Command`]s forwarded to its command sink
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod change;
mod controller;
mod error;
mod key;
mod options;
mod source;
mod state;
mod types;



pub use change::ListChange;
pub use controller::WindowController;
pub use error::{Diagnostic, DiagnosticSink, ListError};
pub use key::ListKey;
pub use options::{
    CommandSink, EmptyStateProvider, RenderRequestCallback, VisibleRangeCallback, WindowOptions,
};
pub use source::{DataSource, KeyExtractor, ListListener};
pub use state::WindowState;
pub use types::{
    Command, EntryItem, EntryKey, IndexRange, ItemKey, RenderEntry, RenderPass, RenderSummary,
    ScrollToIndex,
};
