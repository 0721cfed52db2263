//! Port abstraction for company persistence adapters.

use async_trait::async_trait;

use crate::domain::company::{Company, CompanyMember};
use crate::domain::ids::{CompanyId, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by company repository adapters.
    pub enum CompanyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "company repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "company repository query failed: {message}",
        /// A unique constraint rejected the write (duplicate slug).
        Duplicate { message: String } => "company already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a company together with its owner membership row.
    async fn insert(
        &self,
        company: &Company,
        owner_membership: &CompanyMember,
    ) -> Result<(), CompanyRepositoryError>;

    async fn find_by_id(&self, id: CompanyId)
    -> Result<Option<Company>, CompanyRepositoryError>;

    async fn find_by_slug(&self, slug: &str)
    -> Result<Option<Company>, CompanyRepositoryError>;

    async fn update(&self, company: &Company) -> Result<(), CompanyRepositoryError>;

    /// All company pages, ordered by name.
    async fn list(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Company>, CompanyRepositoryError>;

    async fn count(&self) -> Result<i64, CompanyRepositoryError>;

    /// Companies the user belongs to, ordered by name.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Company>, CompanyRepositoryError>;

    async fn find_membership(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> Result<Option<CompanyMember>, CompanyRepositoryError>;

    async fn insert_membership(
        &self,
        member: &CompanyMember,
    ) -> Result<(), CompanyRepositoryError>;
}
