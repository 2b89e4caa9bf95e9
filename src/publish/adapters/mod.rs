//! Adapter implementations of the publish module's ports.

pub mod memory;
mod social;
mod website;

pub use social::SocialPublisher;
pub use website::WebsitePublisher;
