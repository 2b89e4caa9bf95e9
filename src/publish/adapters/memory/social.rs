//! Scriptable in-memory social gateway for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::publish::{
    domain::SocialPlatform,
    ports::{DispatchRequest, SocialDeliveryError, SocialGateway},
};

/// What the stub gateway should do for a platform.
#[derive(Debug, Clone, Default)]
pub enum StubResponse {
    /// Accept the post and mint a post reference.
    #[default]
    Succeed,
    /// Report the platform unreachable (transient).
    Unavailable(String),
    /// Refuse the post (permanent).
    Reject(String),
}

/// In-memory [`SocialGateway`] with per-platform scripted responses.
///
/// Records every delivery attempt so tests can assert dispatch counts
/// and content.
#[derive(Debug, Clone, Default)]
pub struct StubSocialGateway {
    responses: Arc<RwLock<HashMap<SocialPlatform, StubResponse>>>,
    deliveries: Arc<RwLock<Vec<(SocialPlatform, String)>>>,
    sequence: Arc<AtomicU64>,
}

impl StubSocialGateway {
    /// Creates a gateway that accepts every post.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response for one platform.
    pub fn set_response(&self, platform: SocialPlatform, response: StubResponse) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(platform, response);
        }
    }

    /// Returns every delivery attempt made so far.
    #[must_use]
    pub fn deliveries(&self) -> Vec<(SocialPlatform, String)> {
        self.deliveries
            .read()
            .map(|deliveries| deliveries.clone())
            .unwrap_or_default()
    }

    /// Returns the number of delivery attempts for one platform.
    #[must_use]
    pub fn delivery_count(&self, platform: SocialPlatform) -> usize {
        self.deliveries
            .read()
            .map(|deliveries| {
                deliveries
                    .iter()
                    .filter(|(delivered_to, _)| *delivered_to == platform)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl SocialGateway for StubSocialGateway {
    async fn deliver(
        &self,
        platform: SocialPlatform,
        text: &str,
        _request: &DispatchRequest,
    ) -> Result<String, SocialDeliveryError> {
        if let Ok(mut deliveries) = self.deliveries.write() {
            deliveries.push((platform, text.to_owned()));
        }

        let scripted = self
            .responses
            .read()
            .map(|responses| responses.get(&platform).cloned().unwrap_or_default())
            .unwrap_or_default();
        match scripted {
            StubResponse::Succeed => {
                let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
                Ok(format!("{platform}-post-{sequence}"))
            }
            StubResponse::Unavailable(reason) => {
                Err(SocialDeliveryError::Unavailable { platform, reason })
            }
            StubResponse::Reject(reason) => Err(SocialDeliveryError::Rejected { platform, reason }),
        }
    }
}
