//! Domain model for the editorial task workflow.
//!
//! The task domain owns the workflow state machine: statuses, the
//! triggers that move between them, and the publish intent and schedule
//! metadata each task carries. All infrastructure concerns stay outside
//! the domain boundary.

mod error;
mod ids;
mod intent;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use intent::{ParseScheduleError, Priority, PublishIntent, PublishSchedule};
pub use status::{Applied, TaskStatus, WorkflowTrigger};
pub use task::{NewTask, PersistedTaskData, Task};
