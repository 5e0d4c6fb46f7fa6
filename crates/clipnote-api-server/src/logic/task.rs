use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shared::{
    error::CommonError,
    primitives::{WrappedChronoDateTime, WrappedUuidV4},
};
use utoipa::ToSchema;

use crate::logic::video::Video;
use crate::repository::{CompleteTask, TaskRepositoryLike};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(anyhow::anyhow!("unknown task status: {other}")),
        }
    }
}

// Domain model for Task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Task {
    pub id: WrappedUuidV4,
    pub video_id: WrappedUuidV4,
    pub description: String,
    pub status: TaskStatus,
    pub completed_at: Option<WrappedChronoDateTime>,
    pub created_at: WrappedChronoDateTime,
}

/// A task joined with its owning video, as returned by the task listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct TaskWithVideo {
    pub id: WrappedUuidV4,
    pub video_id: WrappedUuidV4,
    pub description: String,
    pub status: TaskStatus,
    pub completed_at: Option<WrappedChronoDateTime>,
    pub created_at: WrappedChronoDateTime,
    pub video: Video,
}

/// Force the task to `completed` with a fresh completion time, whatever
/// its prior state.
pub async fn complete_task<R: TaskRepositoryLike>(
    repository: &R,
    id: WrappedUuidV4,
) -> Result<Task, CommonError> {
    let existing = repository.get_task_by_id(&id).await?;
    let existing = existing.ok_or_else(|| CommonError::NotFound {
        msg: format!("Task with id {id} not found"),
        lookup_id: id.to_string(),
        source: None,
    })?;

    let now = WrappedChronoDateTime::now();

    let complete_params = CompleteTask {
        id: id.clone(),
        status: TaskStatus::Completed,
        completed_at: now,
    };

    repository.complete_task(&complete_params).await?;

    Ok(Task {
        id,
        video_id: existing.video_id,
        description: existing.description,
        status: TaskStatus::Completed,
        completed_at: Some(now),
        created_at: existing.created_at,
    })
}

/// All tasks, newest first, each embedding its owning video.
pub async fn list_tasks<R: TaskRepositoryLike>(
    repository: &R,
) -> Result<Vec<TaskWithVideo>, CommonError> {
    repository.get_tasks_with_videos().await
}

#[cfg(test)]
mod unit_test {
    use super::*;
    use crate::repository::Repository;
    use shared::primitives::SqlMigrationLoader;
    use shared::test_utils::repository::setup_in_memory_database;

    async fn seed_video(conn: &shared::libsql::Connection, id: &WrappedUuidV4, title: &str) {
        conn.execute(
            "INSERT INTO videos (id, title, url, created_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                id.to_string(),
                title,
                format!("https://videos.example/{id}.mp4"),
                "2026-02-01 10:00:00.000"
            ],
        )
        .await
        .unwrap();
    }

    async fn seed_task(
        conn: &shared::libsql::Connection,
        id: &WrappedUuidV4,
        video_id: &WrappedUuidV4,
        status: &str,
        created_at: &str,
    ) {
        conn.execute(
            "INSERT INTO tasks (id, video_id, description, status, completed_at, created_at) \
             VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
            libsql::params![
                id.to_string(),
                video_id.to_string(),
                "re-export with fixes",
                status,
                created_at
            ],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_complete_task_sets_status_and_time() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let video_id = WrappedUuidV4::new();
        let task_id = WrappedUuidV4::new();
        seed_video(&conn, &video_id, "rough cut").await;
        seed_task(&conn, &task_id, &video_id, "pending", "2026-02-02 09:00:00.000").await;

        let task = complete_task(&repo, task_id.clone()).await.unwrap();
        assert_eq!(task.id, task_id);
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed_at.is_some());

        // completing an already-completed task stays completed
        let again = complete_task(&repo, task_id).await.unwrap();
        assert_eq!(again.status, TaskStatus::Completed);
        assert!(again.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_complete_missing_task_is_not_found() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn);

        let err = complete_task(&repo, WrappedUuidV4::new()).await.unwrap_err();
        assert!(matches!(err, CommonError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_tasks_embeds_video_newest_first() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let video_a = WrappedUuidV4::new();
        let video_b = WrappedUuidV4::new();
        seed_video(&conn, &video_a, "episode one").await;
        seed_video(&conn, &video_b, "episode two").await;

        let older = WrappedUuidV4::new();
        let newer = WrappedUuidV4::new();
        seed_task(&conn, &older, &video_a, "pending", "2026-02-02 09:00:00.000").await;
        seed_task(&conn, &newer, &video_b, "in_progress", "2026-02-03 09:00:00.000").await;

        let tasks = list_tasks(&repo).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, newer);
        assert_eq!(tasks[0].video.id, video_b);
        assert_eq!(tasks[0].video.title, "episode two");
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[1].id, older);
        assert_eq!(tasks[1].video.id, video_a);
        assert!(tasks[1].completed_at.is_none());
    }

    #[test]
    fn test_status_round_trips_as_text() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }
}
