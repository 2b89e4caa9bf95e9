//! Output channel identifiers and platform constraints.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Social platforms the system can cross-post to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    /// Short-form posts, hard 280 character limit.
    Twitter,
    /// Facebook page posts.
    Facebook,
    /// `LinkedIn` company or profile posts.
    Linkedin,
    /// Instagram captions.
    Instagram,
}

impl SocialPlatform {
    /// All platforms the system knows about.
    pub const ALL: [Self; 4] = [
        Self::Twitter,
        Self::Facebook,
        Self::Linkedin,
        Self::Instagram,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
        }
    }

    /// Maximum post length the platform accepts, in characters.
    #[must_use]
    pub const fn max_content_length(self) -> usize {
        match self {
            Self::Twitter => 280,
            Self::Facebook => 63_206,
            Self::Linkedin => 3_000,
            Self::Instagram => 2_200,
        }
    }
}

impl TryFrom<&str> for SocialPlatform {
    type Error = ParseChannelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "twitter" => Ok(Self::Twitter),
            "facebook" => Ok(Self::Facebook),
            "linkedin" => Ok(Self::Linkedin),
            "instagram" => Ok(Self::Instagram),
            _ => Err(ParseChannelError(value.to_owned())),
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An output destination for published content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    /// The canonical website article store.
    Website,
    /// A social platform.
    Social(SocialPlatform),
}

impl ChannelId {
    /// Returns `true` for the website channel.
    #[must_use]
    pub const fn is_website(self) -> bool {
        matches!(self, Self::Website)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Social(platform) => platform.as_str(),
        }
    }
}

impl TryFrom<&str> for ChannelId {
    type Error = ParseChannelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("website") {
            return Ok(Self::Website);
        }
        SocialPlatform::try_from(value).map(Self::Social)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing channel identifiers from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown channel: {0}")]
pub struct ParseChannelError(pub String);
