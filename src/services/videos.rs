use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::codec::{
    decode_record, encode_record, parse_tags, sanitize_file_name, TagsInput, VideoRecord,
    VideoView,
};
use crate::error::AppError;
use crate::services::store::{BlobStore, StoredObject};

const FILE_PREFIX: &str = "videos/files/";
const META_PREFIX: &str = "videos/meta/";

const DEFAULT_CONTENT_TYPE: &str = "video/mp4";
const METADATA_CONTENT_TYPE: &str = "application/json";

/// A new upload as received from the HTTP layer, before any normalization.
#[derive(Debug)]
pub struct NewVideo {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
}

/// Metadata patch. Absent keys leave the field untouched; a present
/// `description` replaces unconditionally, even when empty.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
}

/// The core of the service: CRUD over paired objects in the blob store.
/// Each video is a binary under `videos/files/` plus a JSON sidecar under
/// `videos/meta/`, joined by a generated id. Holds no state between calls
/// beyond the store handle.
#[derive(Clone)]
pub struct VideoStore {
    store: Arc<dyn BlobStore>,
}

/// Sidecar key for an id. Pure function; this is what makes lookup-by-id
/// via prefix listing possible.
fn metadata_path(id: Uuid) -> String {
    format!("{}{}.json", META_PREFIX, id)
}

impl VideoStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Upload a video: file object first, then its metadata sidecar.
    ///
    /// A failed file write aborts before any metadata exists. A failed
    /// sidecar write after the file landed leaves an orphaned file object;
    /// there is no rollback.
    pub async fn create(&self, upload: NewVideo) -> Result<VideoView, AppError> {
        if upload.bytes.is_empty() {
            return Err(AppError::InvalidInput("No file uploaded".to_string()));
        }

        let id = Uuid::new_v4();
        let sanitized = sanitize_file_name(&upload.file_name);
        let name_part = if sanitized.is_empty() {
            format!("{}.mp4", id)
        } else {
            sanitized
        };
        let storage_path = format!("{}{}-{}", FILE_PREFIX, id, name_part);

        let content_type = upload
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let size = upload.bytes.len() as i64;

        let file_obj = self
            .store
            .put(&storage_path, upload.bytes, &content_type)
            .await?;

        let title = upload
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| upload.file_name.clone());

        let now = Utc::now();
        let record = VideoRecord {
            id,
            title,
            description: upload.description.unwrap_or_default(),
            tags: parse_tags(upload.tags),
            file_name: upload.file_name,
            file_url: file_obj.url,
            content_type,
            size,
            created_at: now,
            updated_at: now,
            storage_path,
            metadata_path: metadata_path(id),
        };

        let meta_obj = self
            .store
            .put(
                &record.metadata_path,
                encode_record(&record)?,
                METADATA_CONTENT_TYPE,
            )
            .await?;

        tracing::info!(%id, title = %record.title, size, "video created");
        Ok(VideoView {
            record,
            metadata_url: meta_obj.url,
        })
    }

    /// List every video, newest-updated first. All-or-nothing: a sidecar
    /// that fails to fetch or decode fails the whole listing.
    pub async fn list(&self) -> Result<Vec<VideoView>, AppError> {
        let objects = self.store.list(META_PREFIX).await?;

        let mut videos = Vec::with_capacity(objects.len());
        for obj in objects {
            let bytes = self.store.get(&obj.key).await?;
            let record = decode_record(&bytes)?;
            videos.push(VideoView {
                record,
                metadata_url: obj.url,
            });
        }

        videos.sort_by(|a, b| b.record.updated_at.cmp(&a.record.updated_at));
        Ok(videos)
    }

    /// Resolve a record and its sidecar object by id.
    async fn lookup(&self, id: Uuid) -> Result<(VideoRecord, StoredObject), AppError> {
        let key = metadata_path(id);
        let obj = self
            .store
            .list(&key)
            .await?
            .into_iter()
            .find(|obj| obj.key == key)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        let bytes = self.store.get(&obj.key).await?;
        Ok((decode_record(&bytes)?, obj))
    }

    /// Apply a metadata patch and overwrite the sidecar in place. The
    /// file object, id, and createdAt are carried through unchanged;
    /// updatedAt always refreshes. No concurrency check: last writer wins.
    pub async fn update(&self, id: Uuid, patch: UpdateVideo) -> Result<VideoView, AppError> {
        let (mut record, _) = self.lookup(id).await?;

        if let Some(title) = patch.title {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                record.title = trimmed.to_string();
            }
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(tags) = patch.tags {
            record.tags = parse_tags(Some(tags));
        }
        record.updated_at = Utc::now();

        let meta_obj = self
            .store
            .put(
                &record.metadata_path,
                encode_record(&record)?,
                METADATA_CONTENT_TYPE,
            )
            .await?;

        tracing::info!(%id, "video metadata updated");
        Ok(VideoView {
            record,
            metadata_url: meta_obj.url,
        })
    }

    /// Remove both objects for an id in one batched store call.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let (record, meta_obj) = self.lookup(id).await?;

        self.store
            .delete(&[record.storage_path.clone(), meta_obj.key])
            .await?;

        tracing::info!(%id, "video deleted");
        Ok(())
    }
}
