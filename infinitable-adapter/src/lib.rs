//! Host-facing helpers for the `infinitable` crate.
//!
//! The core crate knows nothing about widgets, events or scripting boundaries. This crate adds
//! the pieces a host integration usually needs on top of it:
//!
//! - a [`Controller`] owning the table lifecycle (`init`/`destroy`) and the host in between
//! - [`Method`] and [`Controller::invoke`], a thin name-based dispatch shim for hosts that
//!   forward operations as strings
//! - scroll anchoring by row id, so the row at the top of the viewport stays put across sort and
//!   filter
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod anchor;
mod controller;
mod error;
mod method;


pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::{Controller, Reply};
pub use error::AdapterError;
pub use method::{Args, Method};
