//! Load-once bootstrap for an external SDK plus the capability it exposes once ready.
//!
//! `loader` owns the process-wide readiness state machine
//! (`NotRequested → Installing → Ready`) and the FIFO queue of callers waiting on it.
//! `sdk` describes the capability object delivered to those callers.

pub mod loader;
pub mod sdk;

pub use loader::*;
pub use sdk::*;
