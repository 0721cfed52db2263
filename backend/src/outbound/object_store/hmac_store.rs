//! Signed-URL object store adapter.
//!
//! Targets an S3-style gateway that honours HMAC-SHA256 query signatures:
//! the signature covers `method|key|expires` with the shared secret, and the
//! gateway replays the computation before admitting the request. The server
//! itself only ever issues URLs and DELETE calls; object bytes travel
//! directly between the client and the store.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode, Url};
use sha2::Sha256;

use crate::domain::ports::{ObjectStore, ObjectStoreError};

type HmacSha256 = Hmac<Sha256>;

const DELETE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the object store gateway.
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub endpoint: Url,
    pub bucket: String,
    pub signing_secret: String,
}

/// Object store adapter issuing HMAC-signed, time-limited URLs.
pub struct HmacObjectStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    signing_secret: Vec<u8>,
}

impl HmacObjectStore {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: ObjectStoreConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DELETE_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            bucket: config.bucket,
            signing_secret: config.signing_secret.into_bytes(),
        })
    }

    fn object_url(&self, key: &str) -> Result<Url, ObjectStoreError> {
        self.endpoint
            .join(&format!("{}/{}", self.bucket, key))
            .map_err(|e| ObjectStoreError::operation(format!("invalid object key {key}: {e}")))
    }

    fn signed_url(
        &self,
        method: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        let expires = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ObjectStoreError::operation(e.to_string()))?
            .as_secs()
            + ttl.as_secs();
        let signature = self.sign(method, key, expires);

        let mut url = self.object_url(key)?;
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &signature);
        Ok(url.into())
    }

    fn sign(&self, method: &str, key: &str, expires: u64) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.signing_secret)
            .expect("HMAC accepts keys of any length");
        mac.update(format!("{method}|{key}|{expires}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[async_trait]
impl ObjectStore for HmacObjectStore {
    fn signed_upload_url(
        &self,
        key: &str,
        _content_type: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        self.signed_url("PUT", key, ttl)
    }

    fn signed_download_url(
        &self,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        self.signed_url("GET", key, ttl)
    }

    fn public_url(&self, key: &str) -> String {
        self.object_url(key)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}/{}", self.endpoint, self.bucket, key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        let url = self.signed_url("DELETE", key, DELETE_TIMEOUT)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ObjectStoreError::connection(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            status => Err(ObjectStoreError::operation(format!(
                "delete {key} returned status {}",
                status.as_u16()
            ))),
        }
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
