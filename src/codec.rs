use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Hard cap on the number of tags kept per video.
pub const MAX_TAGS: usize = 20;

/// The persisted shape of a video's metadata sidecar. Field names are kept
/// camelCase so the stored JSON documents read the same as the API payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_name: String,
    pub file_url: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub storage_path: String,
    pub metadata_path: String,
}

/// View form returned to API callers: the persisted record plus the
/// store-resolved URL of its sidecar. Never written back to the store.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    #[serde(flatten)]
    pub record: VideoRecord,
    pub metadata_url: String,
}

/// Tag input as accepted at the API boundary: either an ordered array of
/// strings or a single comma-separated string. Normalized by `parse_tags`
/// before anything else sees it.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

/// Normalize tag input into the canonical sequence: split CSV input on
/// commas, trim every element, drop empties, keep at most MAX_TAGS.
pub fn parse_tags(input: Option<TagsInput>) -> Vec<String> {
    let raw = match input {
        None => return Vec::new(),
        Some(TagsInput::List(items)) => items,
        Some(TagsInput::Csv(text)) => text.split(',').map(str::to_string).collect(),
    };

    raw.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

/// Build a readable storage-key fragment from a client filename: lowercase,
/// whitespace runs collapsed to a single hyphen, anything outside
/// `[a-z0-9.-]` stripped. Collisions are fine; the id prefix on the full
/// key keeps it globally unique.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push('-');
            }
            last_was_space = true;
        } else {
            last_was_space = false;
            if matches!(c, 'a'..='z' | '0'..='9' | '.' | '-') {
                out.push(c);
            }
        }
    }
    out
}

/// Encode a record for its sidecar object.
pub fn encode_record(record: &VideoRecord) -> Result<Vec<u8>, AppError> {
    serde_json::to_vec(record)
        .map_err(|e| AppError::Corrupt(format!("failed to encode metadata: {}", e)))
}

/// Decode a sidecar body fetched from the store.
pub fn decode_record(bytes: &[u8]) -> Result<VideoRecord, AppError> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::Corrupt(format!("failed to decode metadata: {}", e)))
}
