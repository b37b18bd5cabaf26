use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::codec::{TagsInput, VideoView};
use crate::error::AppError;
use crate::services::videos::{NewVideo, UpdateVideo, VideoStore};

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// GET /videos
#[utoipa::path(
    get,
    path = "/videos",
    responses(
        (status = 200, description = "All videos, most recently updated first", body = Vec<VideoView>),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    tag = "Videos"
)]
pub async fn list_videos(
    State(store): State<VideoStore>,
) -> Result<Json<Vec<VideoView>>, AppError> {
    let videos = store.list().await?;
    tracing::debug!(count = videos.len(), "listed videos");
    Ok(Json(videos))
}

// POST /videos
#[utoipa::path(
    post,
    path = "/videos",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video uploaded", body = VideoView),
        (status = 400, description = "Missing or empty file", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    tag = "Videos"
)]
pub async fn create_video(
    State(store): State<VideoStore>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<VideoView>), AppError> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut title = None;
    let mut description = None;
    let mut tags = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::InvalidInput("Invalid multipart data".to_string()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|_| {
                    AppError::InvalidInput("Failed to read file bytes".to_string())
                })?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            Some("title") => title = Some(read_text(field).await?),
            Some("description") => description = Some(read_text(field).await?),
            Some("tags") => tags = Some(TagsInput::Csv(read_text(field).await?)),
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    let view = store
        .create(NewVideo {
            file_name,
            content_type,
            bytes,
            title,
            description,
            tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|_| AppError::InvalidInput("Invalid multipart data".to_string()))
}

// PATCH /videos/:id
#[utoipa::path(
    patch,
    path = "/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body = UpdateVideo,
    responses(
        (status = 200, description = "Updated video", body = VideoView),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    tag = "Videos"
)]
pub async fn update_video(
    State(store): State<VideoStore>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateVideo>,
) -> Result<Json<VideoView>, AppError> {
    let view = store.update(id, patch).await?;
    Ok(Json(view))
}

// DELETE /videos/:id
#[utoipa::path(
    delete,
    path = "/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted", body = DeleteResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    tag = "Videos"
)]
pub async fn delete_video(
    State(store): State<VideoStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    store.delete(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use crate::routes::create_routes;
    use crate::services::store::memory::MemoryBlobStore;
    use crate::services::videos::VideoStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> axum::Router {
        let store = VideoStore::new(Arc::new(MemoryBlobStore::new()));
        create_routes(store)
    }

    fn multipart_upload(boundary: &str, filename: &str, bytes: &str, title: &str) -> String {
        format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: video/mp4\r\n\r\n\
             {bytes}\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             {title}\r\n\
             --{b}--\r\n",
            b = boundary
        )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_is_empty_initially() {
        let response = app()
            .oneshot(Request::get("/videos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn upload_with_blank_title_defaults_to_filename() {
        let boundary = "test-boundary";
        let body = multipart_upload(boundary, "clip.mp4", "0123456789", "");

        let response = app()
            .oneshot(
                Request::post("/videos")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["title"], "clip.mp4");
        assert_eq!(json["size"], 10);
        assert!(json["metadataUrl"].as_str().unwrap().contains("videos/meta/"));
    }

    #[tokio::test]
    async fn upload_larger_than_the_axum_default_body_cap_is_accepted() {
        let boundary = "test-boundary";
        let payload = "a".repeat(3 * 1024 * 1024);
        let body = multipart_upload(boundary, "big.mp4", &payload, "Big");

        let response = app()
            .oneshot(
                Request::post("/videos")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["size"], 3 * 1024 * 1024);
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let boundary = "test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nhello\r\n--{b}--\r\n",
            b = boundary
        );

        let response = app()
            .oneshot(
                Request::post("/videos")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let response = app()
            .oneshot(
                Request::patch(format!("/videos/{}", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"renamed"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_round_trip_via_http() {
        let store = VideoStore::new(Arc::new(MemoryBlobStore::new()));
        let app = create_routes(store);

        let boundary = "test-boundary";
        let body = multipart_upload(boundary, "clip.mp4", "abcdef", "Demo");
        let created = app
            .clone()
            .oneshot(
                Request::post("/videos")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_str().unwrap().to_string();

        let deleted = app
            .clone()
            .oneshot(
                Request::delete(format!("/videos/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);
        assert_eq!(body_json(deleted).await, serde_json::json!({"success": true}));

        let listed = app
            .oneshot(Request::get("/videos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(listed).await, serde_json::json!([]));
    }
}
