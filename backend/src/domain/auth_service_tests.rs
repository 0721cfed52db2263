use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::auth_service::{AuthService, RegisterInput};
use super::error::ErrorCode;
use super::ports::{MockPasswordHasher, MockUserRepository, UserRepositoryError};
use super::user::{User, UserStatus};

fn register_input() -> RegisterInput {
    RegisterInput {
        email: "ada@example.com".into(),
        password: "correct horse battery".into(),
        display_name: "Ada Lovelace".into(),
        username: Some("ada".into()),
    }
}

fn stored_user() -> User {
    User::new_registration(
        "ada@example.com",
        "stored-hash".into(),
        "Ada Lovelace".into(),
        Some("ada".into()),
    )
}

fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AuthService {
    AuthService::new(Arc::new(users), Arc::new(hasher))
}

#[actix_rt::test]
async fn register_hashes_and_persists() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .with(eq("ada@example.com"))
        .returning(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user| user.email == "ada@example.com" && user.password_hash == "argon-hash")
        .returning(|_| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .with(eq("correct horse battery"))
        .returning(|_| Ok("argon-hash".into()));

    let user = service(users, hasher)
        .register(register_input())
        .await
        .expect("registers");
    assert_eq!(user.display_name, "Ada Lovelace");
    assert!(user.is_active());
}

#[actix_rt::test]
async fn register_rejects_taken_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(|_| Ok(Some(stored_user())));
    let err = service(users, MockPasswordHasher::new())
        .register(register_input())
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn register_maps_unique_violation_to_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_insert()
        .returning(|_| Err(UserRepositoryError::duplicate("users_email_key")));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().returning(|_| Ok("argon-hash".into()));

    let err = service(users, hasher)
        .register(register_input())
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::bad_email("not-an-email", "longenoughpassword", "Ada")]
#[case::short_password("ada@example.com", "short", "Ada")]
#[case::blank_name("ada@example.com", "longenoughpassword", "   ")]
#[actix_rt::test]
async fn register_validates_input(
    #[case] email: &str,
    #[case] password: &str,
    #[case] display_name: &str,
) {
    let input = RegisterInput {
        email: email.into(),
        password: password.into(),
        display_name: display_name.into(),
        username: None,
    };
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .register(input)
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn login_rejects_wrong_password_and_unknown_email_identically() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .with(eq("ada@example.com"))
        .returning(|_| Ok(Some(stored_user())));
    users
        .expect_find_by_email()
        .with(eq("ghost@example.com"))
        .returning(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(false));
    let svc = service(users, hasher);

    let wrong = svc
        .login("ada@example.com", "nope")
        .await
        .expect_err("unauthorized");
    let unknown = svc
        .login("ghost@example.com", "nope")
        .await
        .expect_err("unauthorized");
    assert_eq!(wrong.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong.message(), unknown.message());
}

#[rstest]
#[case::suspended(UserStatus::Suspended)]
#[case::deleted(UserStatus::Deleted)]
#[actix_rt::test]
async fn login_rejects_inactive_accounts(#[case] status: UserStatus) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(move |_| {
        let mut user = stored_user();
        user.status = status;
        Ok(Some(user))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(true));

    let err = service(users, hasher)
        .login("ada@example.com", "correct horse battery")
        .await
        .expect_err("unauthorized");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[actix_rt::test]
async fn login_records_last_login() {
    let expected = stored_user();
    let expected_id = expected.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(expected.clone())));
    users
        .expect_update_last_login()
        .with(eq(expected_id), mockall::predicate::always())
        .returning(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(true));

    let user = service(users, hasher)
        .login("ada@example.com", "correct horse battery")
        .await
        .expect("logs in");
    assert!(user.last_login_at.is_some());
}

#[actix_rt::test]
async fn current_user_reports_vanished_account() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));
    let err = service(users, MockPasswordHasher::new())
        .current_user(super::ids::UserId::random())
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
