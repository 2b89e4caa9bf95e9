//! Orchestration services for the task module.

mod workflow;

pub use workflow::{NewTaskRequest, TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService};
