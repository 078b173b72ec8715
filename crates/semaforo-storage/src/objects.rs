use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

const JSON: &str = "application/json";

/// Body and ETag of a fetched object.
pub struct FetchedObject {
    pub body: Vec<u8>,
    pub etag: String,
}

/// Precondition attached to a PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCondition<'a> {
    Always,
    /// `If-Match`: the object is still at this ETag.
    IfMatch(&'a str),
    /// `If-None-Match: *`: nothing exists under the key yet.
    IfAbsent,
}

pub async fn get_object(client: &Client, bucket: &str, key: &str) -> Result<FetchedObject, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::s3("GetObject", key, err)
            }
        })?;

    let etag = resp.e_tag().unwrap_or_default().to_string();
    let bytes = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::s3("GetObject", key, e))?;

    Ok(FetchedObject {
        body: bytes.into_bytes().to_vec(),
        etag,
    })
}

/// Write a JSON body under `key`, subject to `condition`. Returns the new ETag.
///
/// A failed condition surfaces as `StorageError::PreconditionFailed`; of two
/// writers racing on the same condition exactly one succeeds.
pub async fn put_json(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    condition: WriteCondition<'_>,
) -> Result<String, StorageError> {
    let req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(JSON)
        .body(ByteStream::from(body));

    let req = match condition {
        WriteCondition::Always => req,
        WriteCondition::IfMatch(etag) => req.if_match(etag),
        WriteCondition::IfAbsent => req.if_none_match("*"),
    };

    let resp = req.send().await.map_err(|e| {
        let message = e.into_service_error().to_string();
        if is_condition_failure(&message) {
            StorageError::PreconditionFailed {
                key: key.to_string(),
            }
        } else {
            StorageError::s3("PutObject", key, message)
        }
    })?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

// 412 when the condition does not hold, 409 while another conditional
// write on the key is in flight.
fn is_condition_failure(message: &str) -> bool {
    message.contains("PreconditionFailed") || message.contains("ConditionalRequestConflict")
}

/// Every key under `prefix`, following continuation tokens.
pub async fn list_keys(client: &Client, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
    let mut keys = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let resp = client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token.take())
            .send()
            .await
            .map_err(|e| StorageError::s3("ListObjectsV2", prefix, e.into_service_error()))?;

        keys.extend(resp.contents().iter().filter_map(|obj| obj.key()).map(str::to_string));

        match resp.next_continuation_token() {
            Some(token) if resp.is_truncated() == Some(true) => {
                continuation_token = Some(token.to_string());
            }
            _ => break,
        }
    }

    Ok(keys)
}
