//! Draft storage and review for Masthead.
//!
//! Holds the AI-generated candidate content for each task, enforces the
//! one-live-draft invariant, and turns review decisions into workflow
//! triggers on the owning task.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
