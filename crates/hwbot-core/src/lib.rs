//! Core logic for the homework status notifier.
//!
//! This crate is framework-agnostic. The homework API transport and the chat
//! messenger live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod notifier;
pub mod poll;
pub mod ports;
pub mod validate;
pub mod verdict;

pub use errors::{Error, Result};
