//! Publish intent and scheduling metadata carried on a task.

use crate::publish::domain::{ChannelId, SocialPlatform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Task priority as assigned by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// May wait behind other work.
    Low,
    /// Default priority.
    Medium,
    /// Should be drafted and reviewed first.
    High,
}

/// Channels a task is meant to be published to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublishIntent {
    /// Whether the canonical website article is requested.
    pub wants_website: bool,
    /// Social platforms the task should be cross-posted to.
    pub social_channels: BTreeSet<SocialPlatform>,
}

impl PublishIntent {
    /// Intent targeting only the website.
    #[must_use]
    pub const fn website_only() -> Self {
        Self {
            wants_website: true,
            social_channels: BTreeSet::new(),
        }
    }

    /// Intent targeting the website plus the given social platforms.
    #[must_use]
    pub fn website_and(platforms: impl IntoIterator<Item = SocialPlatform>) -> Self {
        Self {
            wants_website: true,
            social_channels: platforms.into_iter().collect(),
        }
    }

    /// Intent targeting only the given social platforms.
    #[must_use]
    pub fn social_only(platforms: impl IntoIterator<Item = SocialPlatform>) -> Self {
        Self {
            wants_website: false,
            social_channels: platforms.into_iter().collect(),
        }
    }

    /// Resolves the concrete channel set the intent selects.
    #[must_use]
    pub fn channels(&self) -> BTreeSet<ChannelId> {
        let mut channels = BTreeSet::new();
        if self.wants_website {
            channels.insert(ChannelId::Website);
        }
        channels.extend(self.social_channels.iter().copied().map(ChannelId::Social));
        channels
    }

    /// Returns `true` when the intent selects no channel at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.wants_website && self.social_channels.is_empty()
    }
}

/// When a publish request should execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PublishSchedule {
    /// Execute as soon as the request is made.
    Immediate,
    /// Defer execution until at or after the target time.
    Scheduled {
        /// Earliest time the deferred publish may run.
        target_time: DateTime<Utc>,
    },
}

impl PublishSchedule {
    /// Builds a schedule from the persisted mode/timestamp pair.
    ///
    /// # Errors
    ///
    /// Returns [`ParseScheduleError`] when the mode is unknown or a
    /// scheduled mode carries no target time.
    pub fn from_parts(
        mode: &str,
        target_time: Option<DateTime<Utc>>,
    ) -> Result<Self, ParseScheduleError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "immediate" | "now" => Ok(Self::Immediate),
            "scheduled" => target_time
                .map(|time| Self::Scheduled { target_time: time })
                .ok_or(ParseScheduleError::MissingTargetTime),
            other => Err(ParseScheduleError::UnknownMode(other.to_owned())),
        }
    }

    /// Returns the deferred target time, if any.
    #[must_use]
    pub const fn target_time(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Immediate => None,
            Self::Scheduled { target_time } => Some(target_time),
        }
    }
}

/// Error returned while reconstructing a schedule from persisted parts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseScheduleError {
    /// The schedule mode string is not recognised.
    #[error("unknown schedule mode: {0}")]
    UnknownMode(String),

    /// Scheduled mode without a target time.
    #[error("scheduled mode requires a target time")]
    MissingTargetTime,
}
