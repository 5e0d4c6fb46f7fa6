use std::sync::Arc;

use crate::{
    repository::Repository,
    router::{
        internal::InternalService, issue::IssueService, task::TaskService, video::VideoService,
    },
};

pub mod logic;
pub mod repository;
pub mod router;

#[derive(Clone)]
pub struct ApiService {
    pub video_service: Arc<VideoService>,
    pub issue_service: Arc<IssueService>,
    pub task_service: Arc<TaskService>,
    pub internal_service: Arc<InternalService>,
}

impl ApiService {
    pub fn new(repository: Repository) -> Self {
        Self {
            video_service: Arc::new(VideoService::new(repository.clone())),
            issue_service: Arc::new(IssueService::new(repository.clone())),
            task_service: Arc::new(TaskService::new(repository.clone())),
            internal_service: Arc::new(InternalService::new(repository)),
        }
    }
}
