//! Domain model for publish fan-out.
//!
//! Channels, the durable publish artifact and its idempotency key, the
//! normalized payload projection, and the aggregated per-channel outcome
//! types. Infrastructure (stores, transports) lives behind the ports.

mod article;
mod artifact;
mod channel;
mod error;
mod ids;
mod outcome;
mod payload;

pub use article::WebsiteArticle;
pub use artifact::{ArtifactSource, ArtifactStatus, IdempotencyKey, PublishArtifact};
pub use channel::{ChannelId, ParseChannelError, SocialPlatform};
pub use error::{PublishDomainError, PublishError};
pub use ids::{ArticleId, ArtifactId};
pub use outcome::{ChannelOutcome, ChannelReport, OutcomeStatus, PublishOutcome, ScheduleHandle};
pub use payload::PublishPayload;
