//! Diesel-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ids::UserId;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::User;

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserRepositoryError::connection))?;

        diesel::insert_into(users::table)
            .values(UserRow::from_domain(user))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                map_diesel_error_with_unique(
                    e,
                    UserRepositoryError::query,
                    UserRepositoryError::connection,
                    UserRepositoryError::duplicate,
                )
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserRepositoryError::connection))?;

        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| {
                map_diesel_error(e, UserRepositoryError::query, UserRepositoryError::connection)
            })?;
        Ok(row.map(UserRow::into_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserRepositoryError::connection))?;

        let row = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| {
                map_diesel_error(e, UserRepositoryError::query, UserRepositoryError::connection)
            })?;
        Ok(row.map(UserRow::into_domain))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserRepositoryError::connection))?;

        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| {
                map_diesel_error(e, UserRepositoryError::query, UserRepositoryError::connection)
            })?;
        Ok(row.map(UserRow::into_domain))
    }

    async fn update_last_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserRepositoryError::connection))?;

        diesel::update(users::table.find(id.as_uuid()))
            .set((users::last_login_at.eq(Some(at)), users::updated_at.eq(at)))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                map_diesel_error(e, UserRepositoryError::query, UserRepositoryError::connection)
            })?;
        Ok(())
    }
}
