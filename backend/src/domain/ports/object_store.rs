//! Port abstraction for the media object store.

use async_trait::async_trait;
use std::time::Duration;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum ObjectStoreError {
        /// The store endpoint could not be reached.
        Connection { message: String } => "object store unreachable: {message}",
        /// The store rejected the operation.
        Operation { message: String } => "object store operation failed: {message}",
    }
}

/// Signed-URL based object storage. The server never proxies object bytes;
/// clients upload and download against time-limited URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// A URL authorising a PUT of `key` for `ttl`.
    fn signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError>;

    /// A URL authorising a GET of `key` for `ttl`.
    fn signed_download_url(&self, key: &str, ttl: Duration)
    -> Result<String, ObjectStoreError>;

    /// Stable unsigned URL for publicly readable objects.
    fn public_url(&self, key: &str) -> String;

    /// Remove an object. Missing objects are not an error.
    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError>;

    /// The bucket this store writes into.
    fn bucket(&self) -> &str;
}
