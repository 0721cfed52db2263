//! Conversions from port errors to the shared domain error.
//!
//! Connection failures surface as 503s, unique violations as conflicts, and
//! everything else as internal errors with the detail kept out of responses.

use super::error::Error;
use super::ports::{
    AnalyticsRepositoryError, AssistError, CommentRepositoryError, CompanyRepositoryError,
    ConnectionRepositoryError, FollowRepositoryError, GroupRepositoryError,
    MediaRepositoryError, ObjectStoreError, PasswordHasherError, PostRepositoryError,
    ProfileRepositoryError, ReactionRepositoryError, ThreadRepositoryError,
    UserRepositoryError,
};

macro_rules! impl_from_repo_error {
    ($ty:ident { Connection, Query }) => {
        impl From<$ty> for Error {
            fn from(err: $ty) -> Self {
                match err {
                    $ty::Connection { .. } => Self::service_unavailable(err.to_string()),
                    $ty::Query { .. } => Self::internal(err.to_string()),
                }
            }
        }
    };
    ($ty:ident { Connection, Query, Duplicate }) => {
        impl From<$ty> for Error {
            fn from(err: $ty) -> Self {
                match err {
                    $ty::Connection { .. } => Self::service_unavailable(err.to_string()),
                    $ty::Query { .. } => Self::internal(err.to_string()),
                    $ty::Duplicate { .. } => Self::conflict(err.to_string()),
                }
            }
        }
    };
}

impl_from_repo_error!(UserRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(ProfileRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(CompanyRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(PostRepositoryError { Connection, Query });
impl_from_repo_error!(ConnectionRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(FollowRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(ThreadRepositoryError { Connection, Query });
impl_from_repo_error!(GroupRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(ReactionRepositoryError { Connection, Query, Duplicate });
impl_from_repo_error!(CommentRepositoryError { Connection, Query });
impl_from_repo_error!(MediaRepositoryError { Connection, Query });
impl_from_repo_error!(AnalyticsRepositoryError { Connection, Query });

impl From<ObjectStoreError> for Error {
    fn from(err: ObjectStoreError) -> Self {
        match err {
            ObjectStoreError::Connection { .. } => Self::service_unavailable(err.to_string()),
            ObjectStoreError::Operation { .. } => Self::internal(err.to_string()),
        }
    }
}

impl From<AssistError> for Error {
    fn from(err: AssistError) -> Self {
        Self::service_unavailable(err.to_string())
    }
}

impl From<PasswordHasherError> for Error {
    fn from(err: PasswordHasherError) -> Self {
        Self::internal(err.to_string())
    }
}
