//! Shared Diesel error mapping for the repository adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors for repositories without unique constraints: closed
/// connections become connection errors, everything else a query error.
pub fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(String) -> E,
    C: Fn(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}

/// As [`map_diesel_error`] but routing unique violations to a dedicated
/// constructor so services can surface them as conflicts.
pub fn map_diesel_error_with_unique<E, Q, C, D>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
    duplicate: D,
) -> E
where
    Q: Fn(String) -> E,
    C: Fn(String) -> E,
    D: Fn(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            duplicate(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}

fn log_diesel_error(error: &diesel::result::Error) {
    match error {
        diesel::result::Error::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            "diesel operation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserRepositoryError;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err: UserRepositoryError = map_pool_error(
            PoolError::checkout("pool exhausted"),
            UserRepositoryError::connection,
        );
        assert!(matches!(err, UserRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("pool exhausted"));
    }

    #[rstest]
    fn not_found_becomes_a_query_error() {
        let err: UserRepositoryError = map_diesel_error(
            diesel::result::Error::NotFound,
            UserRepositoryError::query,
            UserRepositoryError::connection,
        );
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }
}
