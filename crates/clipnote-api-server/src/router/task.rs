use axum::extract::{Path, State};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    logic::task::{Task, TaskWithVideo, complete_task, list_tasks},
    repository::Repository,
};
use shared::{adapters::openapi::JsonResponse, error::CommonError, primitives::WrappedUuidV4};

pub const SERVICE_ROUTE_KEY: &str = "task";

pub fn create_router() -> OpenApiRouter<Arc<TaskService>> {
    OpenApiRouter::new()
        .routes(routes!(route_complete_task))
        .routes(routes!(route_list_tasks))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}/complete",
    tags = [SERVICE_ROUTE_KEY],
    params(
        ("id" = WrappedUuidV4, Path, description = "Task ID"),
    ),
    responses(
        (status = 200, description = "Mark task as completed", body = Task),
        (status = 400, description = "Bad Request", body = CommonError),
        (status = 404, description = "Not Found", body = CommonError),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "Complete task",
    description = "Set the task status to completed and stamp the completion time",
    operation_id = "complete-task",
)]
async fn route_complete_task(
    State(ctx): State<Arc<TaskService>>,
    Path(id): Path<WrappedUuidV4>,
) -> JsonResponse<Task, CommonError> {
    let res = complete_task(&ctx.repository, id).await;
    JsonResponse::from(res)
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tags = [SERVICE_ROUTE_KEY],
    responses(
        (status = 200, description = "List tasks with their owning videos, newest first", body = Vec<TaskWithVideo>),
        (status = 500, description = "Internal Server Error", body = CommonError),
    ),
    summary = "List tasks",
    description = "List every task joined with its owning video, ordered by creation time descending",
    operation_id = "list-tasks",
)]
async fn route_list_tasks(
    State(ctx): State<Arc<TaskService>>,
) -> JsonResponse<Vec<TaskWithVideo>, CommonError> {
    let res = list_tasks(&ctx.repository).await;
    JsonResponse::from(res)
}

pub struct TaskService {
    repository: Repository,
}

impl TaskService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}
