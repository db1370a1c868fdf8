//! Object store access: one static-credential client, one object download.

use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    Client,
};
use tracing::info;

use crate::{config::ObjectConfig, error::Error};

pub async fn make_s3_client(config: &ObjectConfig) -> Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "environment",
    );
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await;
    Client::new(&sdk_config)
}

/// Download the configured object into memory.
pub async fn fetch_object(client: &Client, config: &ObjectConfig) -> Result<Vec<u8>, Error> {
    let fetch_error = |reason: String| Error::ObjectFetch {
        bucket: config.bucket.clone(),
        key: config.key.clone(),
        reason,
    };

    let resp = client
        .get_object()
        .bucket(&config.bucket)
        .key(&config.key)
        .send()
        .await
        .map_err(|e| fetch_error(DisplayErrorContext(&e).to_string()))?;

    let bytes = resp
        .body
        .collect()
        .await
        .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?
        .into_bytes();

    info!(
        bucket = %config.bucket,
        key = %config.key,
        bytes = bytes.len(),
        "downloaded input object"
    );
    Ok(bytes.to_vec())
}
