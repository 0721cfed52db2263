//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Each submodule is a thin translator between domain types and one
//! infrastructure concern:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **object_store**: signed-URL media storage gateway
//! - **assist**: HTTP content-assist provider
//! - **security**: credential hashing
//!
//! Adapters contain no business logic.

pub mod assist;
pub mod object_store;
pub mod persistence;
pub mod security;
