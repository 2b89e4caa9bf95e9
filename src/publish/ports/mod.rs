//! Port contracts for the publish module.

mod articles;
mod artifacts;
mod publisher;

pub use articles::{ArticleRepository, ArticleRepositoryError, ArticleRepositoryResult};
pub use artifacts::{ArtifactRepository, ArtifactRepositoryError, ArtifactRepositoryResult};
pub use publisher::{ChannelPublisher, DispatchRequest, SocialDeliveryError, SocialGateway};
