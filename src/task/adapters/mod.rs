//! Adapter implementations of the task module's ports.

pub mod memory;
