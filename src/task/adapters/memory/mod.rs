//! In-memory adapters for the task module.

mod task;

pub use task::InMemoryTaskRepository;
