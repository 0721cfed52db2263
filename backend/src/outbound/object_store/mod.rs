//! Object storage adapters for media uploads.

mod hmac_store;

pub use hmac_store::{HmacObjectStore, ObjectStoreConfig};
