//! Aggregated results of a publish or schedule request.

use super::{ArtifactId, ChannelId, PublishError};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// What happened on one channel during a publish request.
#[derive(Debug, Clone)]
pub enum ChannelOutcome {
    /// The channel publisher produced a new durable artifact.
    Published {
        /// Artifact recording the publication.
        artifact_id: ArtifactId,
    },
    /// A live artifact already existed; dispatch was skipped.
    Reused {
        /// The pre-existing artifact.
        artifact_id: ArtifactId,
    },
    /// The channel failed; siblings were not affected.
    Failed {
        /// Classified failure for this channel only.
        error: PublishError,
    },
}

impl ChannelOutcome {
    /// Returns `true` for `Published` and `Reused`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Published { .. } | Self::Reused { .. })
    }

    /// Returns the artifact identifier for successful outcomes.
    #[must_use]
    pub const fn artifact_id(&self) -> Option<ArtifactId> {
        match self {
            Self::Published { artifact_id } | Self::Reused { artifact_id } => Some(*artifact_id),
            Self::Failed { .. } => None,
        }
    }
}

/// Per-channel entry in a publish outcome.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    /// The channel the entry describes.
    pub channel: ChannelId,
    /// What happened on that channel.
    pub outcome: ChannelOutcome,
}

/// Overall disposition of a publish request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Every requested channel succeeded or was reused.
    Success,
    /// The website (if requested) succeeded but a social channel failed.
    PartialSuccess,
    /// The website was requested and failed; the task was not published.
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::PartialSuccess => "partial-success",
            Self::Failed => "failed",
        })
    }
}

/// Structured per-channel result of one publish request.
///
/// Lets the caller present "published to website; twitter failed" and
/// retry only the channels that failed.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// The task that was published.
    pub task_id: TaskId,
    /// Draft content version the request published.
    pub draft_version: u32,
    /// Overall disposition.
    pub status: OutcomeStatus,
    /// One entry per requested channel.
    pub reports: Vec<ChannelReport>,
}

impl PublishOutcome {
    /// Channels that published or were reused.
    #[must_use]
    pub fn succeeded_channels(&self) -> BTreeSet<ChannelId> {
        self.reports
            .iter()
            .filter(|report| report.outcome.is_success())
            .map(|report| report.channel)
            .collect()
    }

    /// Channels that failed.
    #[must_use]
    pub fn failed_channels(&self) -> BTreeSet<ChannelId> {
        self.reports
            .iter()
            .filter(|report| !report.outcome.is_success())
            .map(|report| report.channel)
            .collect()
    }

    /// Returns the report for one channel, if it was requested.
    #[must_use]
    pub fn report_for(&self, channel: ChannelId) -> Option<&ChannelReport> {
        self.reports.iter().find(|report| report.channel == channel)
    }
}

/// Result of a schedule request.
#[derive(Debug, Clone)]
pub enum ScheduleHandle {
    /// Immediate mode: the publish ran synchronously.
    Completed(PublishOutcome),
    /// Scheduled mode: placeholders were persisted for later promotion.
    Deferred {
        /// Earliest time the external executor should promote them.
        target_time: DateTime<Utc>,
        /// The placeholder artifacts, one per pending channel.
        artifact_ids: Vec<ArtifactId>,
    },
}
