//! Social channel publisher parameterized by platform.

use async_trait::async_trait;
use std::sync::Arc;

use crate::publish::{
    domain::{ChannelId, PublishError, SocialPlatform},
    ports::{ChannelPublisher, DispatchRequest, SocialGateway},
};

/// Publishes a social post to one platform through an abstract gateway.
///
/// Platform constraints are enforced here, before any delivery attempt:
/// over-length content is a permanent [`PublishError::PayloadRejected`],
/// never retried. Transport failures surface as
/// [`PublishError::ChannelUnavailable`].
#[derive(Clone)]
pub struct SocialPublisher<G>
where
    G: SocialGateway,
{
    platform: SocialPlatform,
    gateway: Arc<G>,
}

impl<G> SocialPublisher<G>
where
    G: SocialGateway,
{
    /// Creates a publisher for the given platform.
    #[must_use]
    pub const fn new(platform: SocialPlatform, gateway: Arc<G>) -> Self {
        Self { platform, gateway }
    }

    /// Returns the platform this publisher posts to.
    #[must_use]
    pub const fn platform(&self) -> SocialPlatform {
        self.platform
    }
}

#[async_trait]
impl<G> ChannelPublisher for SocialPublisher<G>
where
    G: SocialGateway,
{
    fn channel(&self) -> ChannelId {
        ChannelId::Social(self.platform)
    }

    async fn publish(&self, request: &DispatchRequest) -> Result<String, PublishError> {
        let text = request.payload.social_text.as_str();
        let length = text.chars().count();
        let limit = self.platform.max_content_length();
        if length > limit {
            return Err(PublishError::PayloadRejected(format!(
                "post is {length} characters but {} accepts at most {limit}",
                self.platform
            )));
        }

        let post_ref = self.gateway.deliver(self.platform, text, request).await?;
        Ok(post_ref)
    }
}
