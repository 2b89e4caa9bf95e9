//! Orchestration services for the publish module.

mod orchestrator;
mod scheduler;

pub use orchestrator::{OrchestratorConfig, PublishOrchestrator};
pub use scheduler::SchedulerGateway;
