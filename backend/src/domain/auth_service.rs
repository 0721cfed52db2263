//! Registration, login, and session identity lookups.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::error::Error;
use super::ids::UserId;
use super::ports::{PasswordHasher, UserRepository};
use super::user::User;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Registration request fields after deserialisation.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub username: Option<String>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Create a new active account.
    ///
    /// Fails with a conflict when the email or username is already taken,
    /// whether detected by the pre-check or the unique constraint.
    pub async fn register(&self, input: RegisterInput) -> Result<User, Error> {
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        let display_name = input.display_name.trim();
        if display_name.is_empty() {
            return Err(Error::invalid_request("displayName must not be empty"));
        }
        if let Some(username) = input.username.as_deref() {
            validate_username(username)?;
        }

        if self
            .users
            .find_by_email(&input.email.to_lowercase())
            .await?
            .is_some()
        {
            return Err(Error::conflict("an account with this email already exists"));
        }

        let hash = self.hasher.hash(&input.password)?;
        let user = User::new_registration(
            &input.email,
            hash,
            display_name.to_owned(),
            input.username,
        );
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "registered new user");
        Ok(user)
    }

    /// Verify credentials and record the login time.
    ///
    /// Unknown emails and wrong passwords produce the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let Some(user) = self.users.find_by_email(&email.to_lowercase()).await? else {
            return Err(Error::unauthorized("invalid email or password"));
        };
        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(Error::unauthorized("invalid email or password"));
        }
        if !user.is_active() {
            return Err(Error::unauthorized("this account is not active"));
        }
        let now = Utc::now();
        self.users.update_last_login(user.id, now).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(User {
            last_login_at: Some(now),
            ..user
        })
    }

    /// Resolve the session's user. The row can vanish while the session is
    /// still live; surface that as not-found so the client re-authenticates.
    pub async fn current_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

fn validate_email(email: &str) -> Result<(), Error> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.len() > 254 {
        return Err(Error::invalid_request("email address is not valid"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), Error> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(Error::invalid_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(Error::invalid_request(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), Error> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if username.len() < 3 || username.len() > 32 || !valid_chars {
        return Err(Error::invalid_request(
            "username must be 3-32 characters of letters, digits, '-' or '_'",
        ));
    }
    Ok(())
}
