mod rows;

use std::collections::BTreeMap;

use anyhow::Context;
use shared::{
    error::CommonError,
    primitives::{SqlMigrationLoader, WrappedUuidV4},
};

use crate::logic::issue::Issue;
use crate::logic::task::{Task, TaskWithVideo};
use crate::logic::video::Video;
use crate::repository::{
    CompleteTask, CreateIssue, IssueRepositoryLike, TaskRepositoryLike, UpdateIssue,
    VideoRepositoryLike,
};

#[derive(Clone)]
pub struct Repository {
    conn: shared::libsql::Connection,
}

impl Repository {
    pub fn new(conn: shared::libsql::Connection) -> Self {
        Self { conn }
    }

    /// Cheapest possible store round-trip, used by the health check.
    pub async fn ping(&self) -> Result<(), CommonError> {
        self.conn
            .query("SELECT 1", ())
            .await
            .context("Failed to ping store")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;
        Ok(())
    }
}

impl VideoRepositoryLike for Repository {
    async fn get_videos(&self) -> Result<Vec<Video>, CommonError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, title, url, created_at FROM videos ORDER BY created_at DESC",
                (),
            )
            .await
            .context("Failed to get videos")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(Video::try_from(&row)?);
        }
        Ok(items)
    }

    async fn get_video_by_id(&self, id: &WrappedUuidV4) -> Result<Option<Video>, CommonError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, title, url, created_at FROM videos WHERE id = ?1",
                libsql::params![id],
            )
            .await
            .context("Failed to get video by id")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;

        match rows.next().await? {
            Some(row) => Ok(Some(Video::try_from(&row)?)),
            None => Ok(None),
        }
    }
}

impl IssueRepositoryLike for Repository {
    async fn create_issue(&self, params: &CreateIssue) -> Result<(), CommonError> {
        self.conn
            .execute(
                "INSERT INTO issues (id, video_id, description, timestamp, severity, resolved, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    &params.id,
                    &params.video_id,
                    params.description.as_str(),
                    params.timestamp,
                    params.severity.as_str(),
                    params.resolved as i64,
                    &params.created_at
                ],
            )
            .await
            .context("Failed to create issue")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;
        Ok(())
    }

    async fn get_issue_by_id(&self, id: &WrappedUuidV4) -> Result<Option<Issue>, CommonError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, video_id, description, timestamp, severity, resolved, created_at \
                 FROM issues WHERE id = ?1",
                libsql::params![id],
            )
            .await
            .context("Failed to get issue by id")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;

        match rows.next().await? {
            Some(row) => Ok(Some(Issue::try_from(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_issues_by_video_id(
        &self,
        video_id: &WrappedUuidV4,
    ) -> Result<Vec<Issue>, CommonError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, video_id, description, timestamp, severity, resolved, created_at \
                 FROM issues WHERE video_id = ?1 ORDER BY timestamp ASC",
                libsql::params![video_id],
            )
            .await
            .context("Failed to get issues by video id")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(Issue::try_from(&row)?);
        }
        Ok(items)
    }

    async fn update_issue(&self, params: &UpdateIssue) -> Result<(), CommonError> {
        self.conn
            .execute(
                "UPDATE issues SET description = ?1, timestamp = ?2, severity = ?3, resolved = ?4 \
                 WHERE id = ?5",
                libsql::params![
                    params.description.as_str(),
                    params.timestamp,
                    params.severity.as_str(),
                    params.resolved as i64,
                    &params.id
                ],
            )
            .await
            .context("Failed to update issue")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;
        Ok(())
    }

    async fn delete_issue(&self, id: &WrappedUuidV4) -> Result<u64, CommonError> {
        let affected = self
            .conn
            .execute("DELETE FROM issues WHERE id = ?1", libsql::params![id])
            .await
            .context("Failed to delete issue")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;
        Ok(affected)
    }
}

impl TaskRepositoryLike for Repository {
    async fn get_task_by_id(&self, id: &WrappedUuidV4) -> Result<Option<Task>, CommonError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, video_id, description, status, completed_at, created_at \
                 FROM tasks WHERE id = ?1",
                libsql::params![id],
            )
            .await
            .context("Failed to get task by id")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;

        match rows.next().await? {
            Some(row) => Ok(Some(Task::try_from(&row)?)),
            None => Ok(None),
        }
    }

    async fn complete_task(&self, params: &CompleteTask) -> Result<(), CommonError> {
        self.conn
            .execute(
                "UPDATE tasks SET status = ?1, completed_at = ?2 WHERE id = ?3",
                libsql::params![
                    params.status.as_str(),
                    &params.completed_at,
                    &params.id
                ],
            )
            .await
            .context("Failed to complete task")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;
        Ok(())
    }

    async fn get_tasks_with_videos(&self) -> Result<Vec<TaskWithVideo>, CommonError> {
        let mut rows = self
            .conn
            .query(
                "SELECT t.id, t.video_id, t.description, t.status, t.completed_at, t.created_at, \
                        v.id, v.title, v.url, v.created_at \
                 FROM tasks t \
                 JOIN videos v ON v.id = t.video_id \
                 ORDER BY t.created_at DESC",
                (),
            )
            .await
            .context("Failed to get tasks")
            .map_err(|e| CommonError::Repository {
                msg: e.to_string(),
                source: Some(e),
            })?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(TaskWithVideo::try_from(&row)?);
        }
        Ok(items)
    }
}

impl SqlMigrationLoader for Repository {
    fn load_sql_migrations() -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            (
                "0001_init.up.sql",
                include_str!("../../../migrations/0001_init.up.sql"),
            ),
            (
                "0001_init.down.sql",
                include_str!("../../../migrations/0001_init.down.sql"),
            ),
        ])
    }
}

#[cfg(test)]
mod unit_test {
    use super::*;
    use crate::logic::issue::Severity;
    use crate::logic::task::TaskStatus;
    use shared::primitives::WrappedChronoDateTime;
    use shared::test_utils::repository::setup_in_memory_database;

    async fn seed_video(conn: &shared::libsql::Connection, id: &WrappedUuidV4) {
        conn.execute(
            "INSERT INTO videos (id, title, url, created_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                id.to_string(),
                "dailies",
                "https://videos.example/dailies.mp4",
                "2026-02-01 10:00:00.000"
            ],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_get_video_by_id_not_found() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn);

        let video = repo.get_video_by_id(&WrappedUuidV4::new()).await.unwrap();
        assert!(video.is_none());
    }

    #[tokio::test]
    async fn test_issue_row_round_trip() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let video_id = WrappedUuidV4::new();
        seed_video(&conn, &video_id).await;

        let params = CreateIssue {
            id: WrappedUuidV4::new(),
            video_id: video_id.clone(),
            description: "boom mic in frame".to_string(),
            timestamp: 71.5,
            severity: Severity::Critical,
            resolved: false,
            created_at: WrappedChronoDateTime::now(),
        };
        repo.create_issue(&params).await.unwrap();

        let issue = repo.get_issue_by_id(&params.id).await.unwrap().unwrap();
        assert_eq!(issue.id, params.id);
        assert_eq!(issue.video_id, video_id);
        assert_eq!(issue.description, "boom mic in frame");
        assert_eq!(issue.timestamp, 71.5);
        assert_eq!(issue.severity, Severity::Critical);
        assert!(!issue.resolved);
        assert_eq!(issue.created_at, params.created_at);
    }

    #[tokio::test]
    async fn test_delete_issue_reports_affected_rows() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let video_id = WrappedUuidV4::new();
        seed_video(&conn, &video_id).await;

        let params = CreateIssue {
            id: WrappedUuidV4::new(),
            video_id,
            description: "cut too early".to_string(),
            timestamp: 10.0,
            severity: Severity::Low,
            resolved: false,
            created_at: WrappedChronoDateTime::now(),
        };
        repo.create_issue(&params).await.unwrap();

        assert_eq!(repo.delete_issue(&params.id).await.unwrap(), 1);
        assert_eq!(repo.delete_issue(&params.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_complete_task_persists() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let video_id = WrappedUuidV4::new();
        seed_video(&conn, &video_id).await;

        let task_id = WrappedUuidV4::new();
        conn.execute(
            "INSERT INTO tasks (id, video_id, description, status, completed_at, created_at) \
             VALUES (?1, ?2, ?3, 'pending', NULL, ?4)",
            libsql::params![
                task_id.to_string(),
                video_id.to_string(),
                "color grade pass",
                "2026-02-02 09:00:00.000"
            ],
        )
        .await
        .unwrap();

        let completed_at = WrappedChronoDateTime::now();
        repo.complete_task(&CompleteTask {
            id: task_id.clone(),
            status: TaskStatus::Completed,
            completed_at,
        })
        .await
        .unwrap();

        let task = repo.get_task_by_id(&task_id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_at, Some(completed_at));
    }

    #[tokio::test]
    async fn test_deleting_video_cascades_to_issues() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let video_id = WrappedUuidV4::new();
        seed_video(&conn, &video_id).await;

        let params = CreateIssue {
            id: WrappedUuidV4::new(),
            video_id: video_id.clone(),
            description: "will vanish with the video".to_string(),
            timestamp: 5.0,
            severity: Severity::Medium,
            resolved: false,
            created_at: WrappedChronoDateTime::now(),
        };
        repo.create_issue(&params).await.unwrap();

        conn.execute(
            "DELETE FROM videos WHERE id = ?1",
            libsql::params![video_id.to_string()],
        )
        .await
        .unwrap();

        assert!(
            repo.get_issues_by_video_id(&video_id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
