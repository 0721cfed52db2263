//! Inbound HTTP layer: handlers, session plumbing, and response shapes.

pub mod analytics;
pub mod assist;
pub mod auth;
pub mod companies;
pub mod engagement;
pub mod error;
pub mod feed;
pub mod groups;
pub mod health;
pub mod media;
pub mod messaging;
pub mod networking;
pub mod pagination;
pub mod posts;
pub mod profiles;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
