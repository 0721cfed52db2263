//! Domain layer: entities, services, and the outbound ports they depend on.
//!
//! Nothing in here knows about HTTP or Diesel; inbound adapters call the
//! services and outbound adapters implement the ports.

pub mod analytics;
pub mod analytics_service;
pub mod assist_service;
pub mod auth_service;
pub mod company;
pub mod company_service;
pub mod engagement;
pub mod engagement_service;
pub mod error;
pub mod feed_service;
pub mod group;
pub mod group_service;
pub mod ids;
pub mod media;
pub mod media_service;
pub mod messaging;
pub mod messaging_service;
pub mod networking;
pub mod networking_service;
pub mod pagination;
mod port_errors;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod profile;
pub mod profile_service;
pub mod user;
pub mod visibility;

#[cfg(test)]
mod auth_service_tests;
#[cfg(test)]
mod feed_service_tests;
#[cfg(test)]
mod group_service_tests;
#[cfg(test)]
mod media_service_tests;
#[cfg(test)]
mod post_service_tests;
#[cfg(test)]
mod profile_service_tests;

pub use error::{Error, ErrorCode};
pub use pagination::{Page, PageOf};

/// Result alias for service operations.
pub type ApiResult<T> = Result<T, Error>;
