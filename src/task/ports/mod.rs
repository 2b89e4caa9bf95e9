//! Port contracts for the task module.

mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
