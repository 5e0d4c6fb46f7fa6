use axum::Router;
use utoipa::openapi::tag::TagBuilder;
use utoipa::openapi::{Info, OpenApi};

use crate::ApiService;
use shared::error::CommonError;

pub mod internal;
pub mod issue;
pub mod task;
pub mod video;

pub fn initiate_api_router(api_service: ApiService) -> Result<Router, CommonError> {
    let mut router = Router::new();

    // video router
    let (video_router, _) = video::create_router().split_for_parts();
    let video_router = video_router.with_state(api_service.video_service);
    router = router.merge(video_router);

    // issue router
    let (issue_router, _) = issue::create_router().split_for_parts();
    let issue_router = issue_router.with_state(api_service.issue_service);
    router = router.merge(issue_router);

    // task router
    let (task_router, _) = task::create_router().split_for_parts();
    let task_router = task_router.with_state(api_service.task_service);
    router = router.merge(task_router);

    // internal router
    let (internal_router, _) = internal::create_router().split_for_parts();
    let internal_router = internal_router.with_state(api_service.internal_service);
    router = router.merge(internal_router);

    Ok(router)
}

pub fn generate_openapi_spec() -> OpenApi {
    let (_, mut spec) = video::create_router().split_for_parts();
    let (_, issue_spec) = issue::create_router().split_for_parts();
    let (_, task_spec) = task::create_router().split_for_parts();
    let (_, internal_spec) = internal::create_router().split_for_parts();
    spec.merge(issue_spec);
    spec.merge(task_spec);
    spec.merge(internal_spec);

    // Update OpenAPI metadata
    let mut info = Info::new("clipnote", "A review gateway for videos, issues and tasks");
    info.version = "v1".to_string();
    spec.info = info;

    // Add tag descriptions
    spec.tags = Some(vec![
        TagBuilder::new()
            .name("video")
            .description(Some(
                "Video endpoints for listing and fetching videos under review",
            ))
            .build(),
        TagBuilder::new()
            .name("issue")
            .description(Some(
                "Issue endpoints for flagging, listing, updating and deleting problems inside a video",
            ))
            .build(),
        TagBuilder::new()
            .name("task")
            .description(Some(
                "Task endpoints for listing follow-up work and marking it complete",
            ))
            .build(),
        TagBuilder::new()
            .name("_internal")
            .description(Some("Internal endpoints for greeting and health checks"))
            .build(),
    ]);

    spec
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn test_openapi_spec_covers_all_routes() {
        let spec = generate_openapi_spec();
        let paths = &spec.paths.paths;

        for expected in [
            "/",
            "/api/health",
            "/api/videos",
            "/api/videos/{id}",
            "/api/videos/{video_id}/issues",
            "/api/issues/{id}",
            "/api/tasks/{id}/complete",
            "/api/tasks",
        ] {
            assert!(paths.contains_key(expected), "missing path: {expected}");
        }

        assert_eq!(spec.info.title, "clipnote");
    }
}
