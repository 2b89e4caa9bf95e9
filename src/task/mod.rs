//! Editorial task workflow for Masthead.
//!
//! Owns the workflow state machine that moves a unit of editorial work
//! from `backlog` through drafting and review to `published`, together
//! with the publish intent and scheduling metadata each task carries.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
