mod sqlite;

pub use sqlite::Repository;

use shared::error::CommonError;
use shared::libsql::{establish_db_connection, inject_auth_token_to_db_url};
use shared::primitives::{SqlMigrationLoader, WrappedChronoDateTime, WrappedUuidV4};
use tracing::debug;
use url::Url;

use crate::logic::issue::{Issue, Severity};
use crate::logic::task::{Task, TaskStatus, TaskWithVideo};
use crate::logic::video::Video;

pub trait VideoRepositoryLike {
    async fn get_videos(&self) -> Result<Vec<Video>, CommonError>;
    async fn get_video_by_id(&self, id: &WrappedUuidV4) -> Result<Option<Video>, CommonError>;
}

pub trait IssueRepositoryLike {
    async fn create_issue(&self, params: &CreateIssue) -> Result<(), CommonError>;
    async fn get_issue_by_id(&self, id: &WrappedUuidV4) -> Result<Option<Issue>, CommonError>;
    async fn get_issues_by_video_id(
        &self,
        video_id: &WrappedUuidV4,
    ) -> Result<Vec<Issue>, CommonError>;
    async fn update_issue(&self, params: &UpdateIssue) -> Result<(), CommonError>;
    /// Returns the number of rows removed.
    async fn delete_issue(&self, id: &WrappedUuidV4) -> Result<u64, CommonError>;
}

pub trait TaskRepositoryLike {
    async fn get_task_by_id(&self, id: &WrappedUuidV4) -> Result<Option<Task>, CommonError>;
    async fn complete_task(&self, params: &CompleteTask) -> Result<(), CommonError>;
    async fn get_tasks_with_videos(&self) -> Result<Vec<TaskWithVideo>, CommonError>;
}

pub struct CreateIssue {
    pub id: WrappedUuidV4,
    pub video_id: WrappedUuidV4,
    pub description: String,
    pub timestamp: f64,
    pub severity: Severity,
    pub resolved: bool,
    pub created_at: WrappedChronoDateTime,
}

pub struct UpdateIssue {
    pub id: WrappedUuidV4,
    pub description: String,
    pub timestamp: f64,
    pub severity: Severity,
    pub resolved: bool,
}

pub struct CompleteTask {
    pub id: WrappedUuidV4,
    pub status: TaskStatus,
    pub completed_at: WrappedChronoDateTime,
}

/// Connects to the store and applies migrations.
pub async fn setup_repository(
    conn_string: &Url,
    auth_token: &Option<String>,
) -> Result<(libsql::Database, shared::libsql::Connection, Repository), CommonError> {
    debug!("conn_string: {}", conn_string);
    let migrations = Repository::load_sql_migrations();
    let auth_conn_string = inject_auth_token_to_db_url(conn_string, auth_token)?;
    let (db, conn) = establish_db_connection(&auth_conn_string, Some(migrations)).await?;

    let repo = Repository::new(conn.clone());
    Ok((db, conn, repo))
}
