use async_trait::async_trait;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, Error as S3Error, ObjectCannedAcl, ObjectIdentifier};
use aws_sdk_s3::Client;

use crate::config::Config;
use crate::error::AppError;
use crate::services::store::{BlobStore, StoredObject};

/// Blob-store adapter over an S3-compatible object store. The configured
/// credential is baked into the client once at construction; every call
/// goes out under it.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket_name: String,
    region: String,
    endpoint: Option<String>,
}

impl S3BlobStore {
    pub async fn new(config: &Config) -> Self {
        let region = aws_sdk_s3::config::Region::new(config.aws_region.clone());

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(region);

        match (&config.aws_access_key_id, &config.aws_secret_access_key) {
            (Some(key_id), Some(secret)) => {
                let credentials = aws_sdk_s3::config::Credentials::new(
                    key_id.clone(),
                    secret.clone(),
                    None,
                    None,
                    "manual_config",
                );
                s3_config_builder = s3_config_builder.credentials_provider(credentials);
            }
            _ => {
                // Production mode: lean on the ambient provider chain.
                let ambient = aws_config::defaults(
                    aws_sdk_s3::config::BehaviorVersion::latest(),
                )
                .load()
                .await;
                if let Some(provider) = ambient.credentials_provider() {
                    s3_config_builder = s3_config_builder.credentials_provider(provider);
                }
            }
        }

        if let Some(endpoint) = &config.s3_endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());

        Self {
            client,
            bucket_name: config.s3_bucket_name.clone(),
            region: config.aws_region.clone(),
            endpoint: config.s3_endpoint.clone(),
        }
    }

    /// Resolve the public URL for a key: path-style against a custom
    /// endpoint, virtual-hosted form against AWS proper.
    fn resolve_url(&self, key: &str) -> String {
        if let Some(endpoint) = &self.endpoint {
            format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket_name,
                key
            )
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket_name, self.region, key
            )
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("failed to upload `{}`: {}", key, e))
            })?;

        Ok(StoredObject {
            key: key.to_string(),
            url: self.resolve_url(key),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, AppError> {
        // Paginated: a single ListObjectsV2 call caps out at 1000 keys.
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                AppError::StorageUnavailable(format!("failed to list `{}`: {}", prefix, e))
            })?;
            objects.extend(page_objects(&page, |key| self.resolve_url(key)));
        }

        Ok(objects)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("failed to fetch `{}`: {}", key, e))
            })?;

        let data = resp.body.collect().await.map_err(|e| {
            AppError::StorageUnavailable(format!("failed to read body of `{}`: {}", key, e))
        })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), AppError> {
        let identifiers = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::StorageUnavailable(format!("bad delete key: {}", e)))?;

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .build()
            .map_err(|e| {
                AppError::StorageUnavailable(format!("failed to build delete request: {}", e))
            })?;

        let resp = self
            .client
            .delete_objects()
            .bucket(&self.bucket_name)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("failed to delete objects: {}", e))
            })?;

        // DeleteObjects reports per-key failures in the body of an
        // otherwise successful response.
        if let Some(msg) = delete_failures(resp.errors()) {
            return Err(AppError::StorageUnavailable(msg));
        }

        Ok(())
    }
}

/// Flatten one listing page into stored objects with resolved URLs.
fn page_objects(
    page: &ListObjectsV2Output,
    resolve_url: impl Fn(&str) -> String,
) -> Vec<StoredObject> {
    page.contents()
        .iter()
        .filter_map(|obj| obj.key())
        .map(|key| StoredObject {
            key: key.to_string(),
            url: resolve_url(key),
        })
        .collect()
}

/// Summarize per-key DeleteObjects failures, or None if every key deleted.
fn delete_failures(errors: &[S3Error]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let keys: Vec<&str> = errors
        .iter()
        .map(|e| e.key().unwrap_or("<unknown key>"))
        .collect();
    Some(format!("failed to delete objects: {}", keys.join(", ")))
}
