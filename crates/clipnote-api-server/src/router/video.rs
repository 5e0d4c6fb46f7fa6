use axum::extract::{Path, State};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    logic::video::{GetVideoResponse, Video, get_video, list_videos},
    repository::Repository,
};
use shared::{adapters::openapi::JsonResponse, error::CommonError, primitives::WrappedUuidV4};

pub const SERVICE_ROUTE_KEY: &str = "video";

pub fn create_router() -> OpenApiRouter<Arc<VideoService>> {
    OpenApiRouter::new()
        .routes(routes!(route_list_videos))
        .routes(routes!(route_get_video))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tags = [SERVICE_ROUTE_KEY],
    responses(
        (status = 200, description = "List videos, newest first", body = Vec<Video>),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "List videos",
    description = "List every video known to the store, ordered by creation time descending",
    operation_id = "list-videos",
)]
async fn route_list_videos(
    State(ctx): State<Arc<VideoService>>,
) -> JsonResponse<Vec<Video>, CommonError> {
    let res = list_videos(&ctx.repository).await;
    JsonResponse::from(res)
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tags = [SERVICE_ROUTE_KEY],
    params(
        ("id" = WrappedUuidV4, Path, description = "Video ID"),
    ),
    responses(
        (status = 200, description = "Get video by id", body = GetVideoResponse),
        (status = 400, description = "Bad Request", body = CommonError),
        (status = 404, description = "Not Found", body = CommonError),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "Get video",
    description = "Fetch a single video by its unique identifier",
    operation_id = "get-video",
)]
async fn route_get_video(
    State(ctx): State<Arc<VideoService>>,
    Path(id): Path<WrappedUuidV4>,
) -> JsonResponse<GetVideoResponse, CommonError> {
    let res = get_video(&ctx.repository, id).await;
    JsonResponse::from(res)
}

pub struct VideoService {
    repository: Repository,
}

impl VideoService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}
