//! Diesel-backed company repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::company::{Company, CompanyMember};
use crate::domain::ids::{CompanyId, UserId};
use crate::domain::ports::{CompanyRepository, CompanyRepositoryError};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::{CompanyMemberRow, CompanyRow};
use super::pool::DbPool;
use super::schema::{companies, company_members};

#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> CompanyRepositoryError {
    map_diesel_error(
        e,
        CompanyRepositoryError::query,
        CompanyRepositoryError::connection,
    )
}

fn write_error(e: diesel::result::Error) -> CompanyRepositoryError {
    map_diesel_error_with_unique(
        e,
        CompanyRepositoryError::query,
        CompanyRepositoryError::connection,
        CompanyRepositoryError::duplicate,
    )
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn insert(
        &self,
        company: &Company,
        owner_membership: &CompanyMember,
    ) -> Result<(), CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        let company_row = CompanyRow::from_domain(company);
        let member_row = CompanyMemberRow::from_domain(owner_membership);
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(companies::table)
                    .values(company_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(company_members::table)
                    .values(member_row)
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(write_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CompanyId,
    ) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        let row = companies::table
            .find(id.as_uuid())
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(CompanyRow::into_domain))
    }

    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        let row = companies::table
            .filter(companies::slug.eq(slug))
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(CompanyRow::into_domain))
    }

    async fn update(&self, company: &Company) -> Result<(), CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        diesel::update(companies::table.find(company.id.as_uuid()))
            .set((
                companies::name.eq(&company.name),
                companies::description.eq(&company.description),
                companies::updated_at.eq(company.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        let rows = companies::table
            .order(companies::name.asc())
            .offset(offset)
            .limit(limit)
            .select(CompanyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(CompanyRow::into_domain).collect())
    }

    async fn count(&self) -> Result<i64, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        companies::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        let rows = companies::table
            .inner_join(company_members::table)
            .filter(company_members::user_id.eq(user_id.as_uuid()))
            .order(companies::name.asc())
            .select(CompanyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(CompanyRow::into_domain).collect())
    }

    async fn find_membership(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> Result<Option<CompanyMember>, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        let row = company_members::table
            .find((company_id.as_uuid(), user_id.as_uuid()))
            .select(CompanyMemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(CompanyMemberRow::into_domain))
    }

    async fn insert_membership(
        &self,
        member: &CompanyMember,
    ) -> Result<(), CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CompanyRepositoryError::connection))?;

        diesel::insert_into(company_members::table)
            .values(CompanyMemberRow::from_domain(member))
            .execute(&mut conn)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}
