use aws_sdk_s3::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;
use crate::objects;

const JSON: &str = "application/json";

/// Load a JSON document from S3. `Ok(None)` when the key does not exist.
pub async fn load_json<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match objects::get_object(client, bucket, key).await {
        Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON document to S3, replacing any existing object. Returns the new ETag.
pub async fn save_json<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    objects::put_object(client, bucket, key, body, Some(JSON)).await
}

/// Create a JSON document that must not exist yet. Fails with
/// `StorageError::AlreadyExists` otherwise.
pub async fn create_json<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    objects::put_object_if_absent(client, bucket, key, body, Some(JSON)).await
}
