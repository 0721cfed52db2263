//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! The adapters are thin translators: Diesel row structs (`models.rs`) and
//! schema definitions (`schema.rs`) stay internal to this module, and every
//! database error is mapped into the owning port's error type. No business
//! logic lives here.

mod diesel_analytics_repository;
mod diesel_comment_repository;
mod diesel_company_repository;
mod diesel_connection_repository;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_media_repository;
mod diesel_post_repository;
mod diesel_profile_repository;
mod diesel_reaction_repository;
mod diesel_thread_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_analytics_repository::DieselAnalyticsRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_connection_repository::DieselConnectionRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_media_repository::DieselMediaRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_reaction_repository::DieselReactionRepository;
pub use diesel_thread_repository::DieselThreadRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
