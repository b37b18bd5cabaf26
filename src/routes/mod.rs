mod home;
mod videos;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::services::videos::VideoStore;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        videos::list_videos,
        videos::create_video,
        videos::update_video,
        videos::delete_video,
    ),
    components(
        schemas(
            crate::codec::VideoRecord,
            crate::codec::VideoView,
            crate::codec::TagsInput,
            crate::services::videos::UpdateVideo,
            videos::DeleteResponse,
            videos::ErrorResponse,
        )
    ),
    tags(
        (name = "General", description = "Library UI"),
        (name = "Videos", description = "Upload, list, edit, and delete videos")
    ),
    info(
        title = "VideoVault API",
        version = "0.1.0",
        description = "A Rust/Axum video library backed by an S3-compatible object store",
    )
)]
struct ApiDoc;

/// Upload cap; axum's 2 MB default is far too small for video files.
const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

pub fn create_routes(store: VideoStore) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/videos", get(videos::list_videos).post(videos::create_video))
        .route(
            "/videos/{id}",
            delete(videos::delete_video).patch(videos::update_video),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(store);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
