//! Outbound port traits the domain services depend on.
//!
//! Adapters live under `crate::outbound`; tests substitute the generated
//! mocks.

mod macros;

pub mod analytics_repository;
pub mod assist_client;
pub mod comment_repository;
pub mod company_repository;
pub mod connection_repository;
pub mod follow_repository;
pub mod group_repository;
pub mod media_repository;
pub mod object_store;
pub mod password_hasher;
pub mod post_repository;
pub mod profile_repository;
pub mod reaction_repository;
pub mod thread_repository;
pub mod user_repository;

pub use analytics_repository::{AnalyticsRepository, AnalyticsRepositoryError};
pub use assist_client::{AssistClient, AssistError, BioRequest, ModerationDecision};
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use company_repository::{CompanyRepository, CompanyRepositoryError};
pub use connection_repository::{ConnectionRepository, ConnectionRepositoryError};
pub use follow_repository::{FollowRepository, FollowRepositoryError};
pub use group_repository::{GroupRepository, GroupRepositoryError};
pub use media_repository::{MediaRepository, MediaRepositoryError};
pub use object_store::{ObjectStore, ObjectStoreError};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use post_repository::{FeedQuery, PostRepository, PostRepositoryError};
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
pub use reaction_repository::{ReactionRepository, ReactionRepositoryError};
pub use thread_repository::{ThreadRepository, ThreadRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use assist_client::MockAssistClient;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
#[cfg(test)]
pub use connection_repository::MockConnectionRepository;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
#[cfg(test)]
pub use group_repository::MockGroupRepository;
#[cfg(test)]
pub use media_repository::MockMediaRepository;
#[cfg(test)]
pub use object_store::MockObjectStore;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use post_repository::MockPostRepository;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
#[cfg(test)]
pub use reaction_repository::MockReactionRepository;
#[cfg(test)]
pub use thread_repository::MockThreadRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
