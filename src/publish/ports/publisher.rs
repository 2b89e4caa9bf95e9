//! Channel publisher and social transport ports.

use crate::publish::domain::{ArtifactSource, ChannelId, PublishError, PublishPayload, SocialPlatform};
use async_trait::async_trait;
use thiserror::Error;

/// One channel dispatch as handed to a publisher.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// Records the dispatch belongs to.
    pub source: ArtifactSource,
    /// Normalized content to publish.
    pub payload: PublishPayload,
}

/// Uniform capability of one output channel.
///
/// Publishers are independently fallible and know nothing of their
/// siblings; the orchestrator owns fan-out, timeouts, and aggregation.
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// The channel this publisher serves.
    fn channel(&self) -> ChannelId;

    /// Publishes the payload, returning the channel-side reference
    /// (article id, platform post id) on success.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::PayloadRejected`] for permanent constraint
    /// violations and [`PublishError::ChannelUnavailable`] for transient
    /// delivery failures.
    async fn publish(&self, request: &DispatchRequest) -> Result<String, PublishError>;
}

/// Abstract transport to a social platform.
///
/// The concrete wire protocol is out of scope; adapters range from HTTP
/// clients to the scriptable stub used in tests.
#[async_trait]
pub trait SocialGateway: Send + Sync {
    /// Delivers a post, returning the platform-side post reference.
    ///
    /// # Errors
    ///
    /// Returns [`SocialDeliveryError`] classifying the failure as
    /// transient or permanent.
    async fn deliver(
        &self,
        platform: SocialPlatform,
        text: &str,
        request: &DispatchRequest,
    ) -> Result<String, SocialDeliveryError>;
}

/// Failure classification reported by a social transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SocialDeliveryError {
    /// The platform could not be reached; safe to retry later.
    #[error("{platform} unavailable: {reason}")]
    Unavailable {
        /// Platform that was unreachable.
        platform: SocialPlatform,
        /// Transport-level detail.
        reason: String,
    },

    /// The platform refused the post; retrying will not help.
    #[error("{platform} rejected the post: {reason}")]
    Rejected {
        /// Platform that refused.
        platform: SocialPlatform,
        /// Platform-supplied detail.
        reason: String,
    },
}

impl From<SocialDeliveryError> for PublishError {
    fn from(err: SocialDeliveryError) -> Self {
        match err {
            SocialDeliveryError::Unavailable { .. } => Self::ChannelUnavailable(err.to_string()),
            SocialDeliveryError::Rejected { .. } => Self::PayloadRejected(err.to_string()),
        }
    }
}
