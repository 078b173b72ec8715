//! Typed JSON documents on top of `objects`.

use aws_sdk_s3::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::{self, WriteCondition};

/// Fetch and decode `key`. `None` when nothing is stored there.
pub async fn load_json<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Option<(T, String)>, StorageError> {
    match objects::get_object(client, bucket, key).await {
        Ok(fetched) => {
            let value = serde_json::from_slice(&fetched.body)?;
            Ok(Some((value, fetched.etag)))
        }
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Like [`load_json`], but a missing key is an error.
pub async fn require_json<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<(T, String), StorageError> {
    load_json(client, bucket, key)
        .await?
        .ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })
}

/// Encode and write `value`. Returns the new ETag.
pub async fn save_json<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
    condition: WriteCondition<'_>,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    objects::put_json(client, bucket, key, body, condition).await
}
