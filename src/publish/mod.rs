//! Publish fan-out for Masthead.
//!
//! Converts approved drafts into durable publish artifacts, dispatches
//! the requested channels concurrently with per-channel failure
//! isolation, and supports immediate or time-deferred execution.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
