//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::UserId;

/// Account lifecycle state. Suspended and deleted accounts cannot log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    Deleted,
}

impl UserStatus {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Role key granted to new registrations.
pub const DEFAULT_ROLE: &str = "user";

/// A registered user identity.
///
/// The credential hash never leaves the domain; response mapping at the HTTP
/// edge strips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: UserStatus,
    pub roles: Vec<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Construct a fresh active user for registration.
    ///
    /// Emails are stored lower-case so the unique constraint is
    /// case-insensitive in effect.
    pub fn new_registration(
        email: &str,
        password_hash: String,
        display_name: String,
        username: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::random(),
            email: email.to_lowercase(),
            username,
            display_name,
            password_hash,
            status: UserStatus::Active,
            roles: vec![DEFAULT_ROLE.to_owned()],
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account may authenticate.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_lowercases_email_and_grants_default_role() {
        let user = User::new_registration("Ada@Example.COM", "hash".into(), "Ada".into(), None);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.roles, vec![DEFAULT_ROLE.to_owned()]);
        assert!(user.is_active());
    }

    #[test]
    fn status_text_round_trips() {
        for status in [
            UserStatus::Active,
            UserStatus::Suspended,
            UserStatus::Deleted,
        ] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("bogus"), None);
    }
}
