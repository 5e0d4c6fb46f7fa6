use axum::extract::{Json, Path, State};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    logic::issue::{
        CreateIssueRequest, DeleteIssueResponse, Issue, UpdateIssueRequest, create_issue,
        delete_issue, list_issues_for_video, update_issue,
    },
    repository::Repository,
};
use shared::{
    adapters::openapi::{CreatedResponse, JsonResponse},
    error::CommonError,
    primitives::WrappedUuidV4,
};

pub const SERVICE_ROUTE_KEY: &str = "issue";

pub fn create_router() -> OpenApiRouter<Arc<IssueService>> {
    OpenApiRouter::new()
        .routes(routes!(route_create_issue))
        .routes(routes!(route_list_issues_for_video))
        .routes(routes!(route_update_issue))
        .routes(routes!(route_delete_issue))
}

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/issues",
    tags = [SERVICE_ROUTE_KEY],
    params(
        ("video_id" = WrappedUuidV4, Path, description = "Owning video ID"),
    ),
    request_body = CreateIssueRequest,
    responses(
        (status = 201, description = "Create an issue against a video", body = Issue),
        (status = 400, description = "Bad Request", body = CommonError),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "Create issue",
    description = "Flag a new issue at a timestamp position inside the given video",
    operation_id = "create-issue",
)]
async fn route_create_issue(
    State(ctx): State<Arc<IssueService>>,
    Path(video_id): Path<WrappedUuidV4>,
    Json(request): Json<CreateIssueRequest>,
) -> CreatedResponse<Issue, CommonError> {
    let res = create_issue(&ctx.repository, video_id, request).await;
    CreatedResponse::from(res)
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}/issues",
    tags = [SERVICE_ROUTE_KEY],
    params(
        ("video_id" = WrappedUuidV4, Path, description = "Owning video ID"),
    ),
    responses(
        (status = 200, description = "List issues for a video, by timestamp ascending", body = Vec<Issue>),
        (status = 400, description = "Bad Request", body = CommonError),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "List issues for video",
    description = "List every issue flagged against the given video, ordered by position in the video",
    operation_id = "list-issues-for-video",
)]
async fn route_list_issues_for_video(
    State(ctx): State<Arc<IssueService>>,
    Path(video_id): Path<WrappedUuidV4>,
) -> JsonResponse<Vec<Issue>, CommonError> {
    let res = list_issues_for_video(&ctx.repository, video_id).await;
    JsonResponse::from(res)
}

#[utoipa::path(
    put,
    path = "/api/issues/{id}",
    tags = [SERVICE_ROUTE_KEY],
    params(
        ("id" = WrappedUuidV4, Path, description = "Issue ID"),
    ),
    request_body = UpdateIssueRequest,
    responses(
        (status = 200, description = "Update issue", body = Issue),
        (status = 400, description = "Bad Request", body = CommonError),
        (status = 404, description = "Not Found", body = CommonError),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "Update issue",
    description = "Overwrite the description, timestamp, severity and resolved flag of an issue",
    operation_id = "update-issue",
)]
async fn route_update_issue(
    State(ctx): State<Arc<IssueService>>,
    Path(id): Path<WrappedUuidV4>,
    Json(request): Json<UpdateIssueRequest>,
) -> JsonResponse<Issue, CommonError> {
    let res = update_issue(&ctx.repository, id, request).await;
    JsonResponse::from(res)
}

#[utoipa::path(
    delete,
    path = "/api/issues/{id}",
    tags = [SERVICE_ROUTE_KEY],
    params(
        ("id" = WrappedUuidV4, Path, description = "Issue ID"),
    ),
    responses(
        (status = 200, description = "Delete issue", body = DeleteIssueResponse),
        (status = 400, description = "Bad Request", body = CommonError),
        (status = 404, description = "Not Found", body = CommonError),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "Delete issue",
    description = "Remove an issue by its unique identifier",
    operation_id = "delete-issue",
)]
async fn route_delete_issue(
    State(ctx): State<Arc<IssueService>>,
    Path(id): Path<WrappedUuidV4>,
) -> JsonResponse<DeleteIssueResponse, CommonError> {
    let res = delete_issue(&ctx.repository, id).await;
    JsonResponse::from(res)
}

pub struct IssueService {
    repository: Repository,
}

impl IssueService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}
