//! Adapter implementations of the draft module's ports.

pub mod memory;
