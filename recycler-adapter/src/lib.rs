//! Adapter utilities for the `recycler` crate.
//!
//! The `recycler` crate is UI-agnostic and only models the data and the window. This crate
//! provides the framework-neutral plumbing an adapter needs on top of it:
//!
//! - [`SharedSource`]: a shared handle to a collection that rejects re-entrant mutation
//! - [`RecyclerList`]: a list driver that owns the controller and its subscription
//!
//! This crate does not bind to any UI toolkit.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod list;
mod shared;

#[cfg(test)]
mod tests;

pub use list::RecyclerList;
pub use shared::SharedSource;
