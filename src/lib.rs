//! Masthead: editorial workflow and publishing orchestration.
//!
//! This crate provides the core of an editorial content pipeline: the
//! workflow state machine that moves a task from creation through
//! AI-assisted drafting, human review, and approval, and the publishing
//! orchestrator that fans an approved draft out to the website and
//! social channels with idempotent, partial-failure-aware semantics.
//!
//! # Architecture
//!
//! Masthead follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, transports)
//!
//! # Modules
//!
//! - [`task`]: the task aggregate and its workflow state machine
//! - [`draft`]: draft storage and the review actions that drive the workflow
//! - [`publish`]: channel publishers, the fan-out orchestrator, and the
//!   scheduler gateway for deferred publication

pub mod draft;
pub mod publish;
pub mod task;
