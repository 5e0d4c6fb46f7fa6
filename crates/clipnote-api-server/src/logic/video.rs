use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shared::{
    error::CommonError,
    primitives::{WrappedChronoDateTime, WrappedUuidV4},
};
use utoipa::ToSchema;

use crate::repository::VideoRepositoryLike;

// Domain model for Video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Video {
    pub id: WrappedUuidV4,
    pub title: String,
    pub url: String,
    pub created_at: WrappedChronoDateTime,
}

pub type GetVideoResponse = Video;

/// All videos, newest first.
pub async fn list_videos<R: VideoRepositoryLike>(
    repository: &R,
) -> Result<Vec<Video>, CommonError> {
    repository.get_videos().await
}

pub async fn get_video<R: VideoRepositoryLike>(
    repository: &R,
    id: WrappedUuidV4,
) -> Result<GetVideoResponse, CommonError> {
    let video = repository.get_video_by_id(&id).await?;
    video.ok_or_else(|| CommonError::NotFound {
        msg: format!("Video with id {id} not found"),
        lookup_id: id.to_string(),
        source: None,
    })
}

#[cfg(test)]
mod unit_test {
    use super::*;
    use crate::repository::Repository;
    use shared::primitives::SqlMigrationLoader;
    use shared::test_utils::repository::setup_in_memory_database;

    async fn seed_video(
        conn: &shared::libsql::Connection,
        id: &WrappedUuidV4,
        title: &str,
        created_at: &str,
    ) {
        conn.execute(
            "INSERT INTO videos (id, title, url, created_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                id.to_string(),
                title,
                format!("https://videos.example/{id}.mp4"),
                created_at
            ],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_get_video_returns_record() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let id = WrappedUuidV4::new();
        seed_video(&conn, &id, "Launch teaser", "2026-02-01 10:00:00.000").await;

        let video = get_video(&repo, id.clone()).await.unwrap();
        assert_eq!(video.id, id);
        assert_eq!(video.title, "Launch teaser");
    }

    #[tokio::test]
    async fn test_get_video_not_found() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn);

        let err = get_video(&repo, WrappedUuidV4::new()).await.unwrap_err();
        assert!(matches!(err, CommonError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_videos_newest_first() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn.clone());

        let oldest = WrappedUuidV4::new();
        let middle = WrappedUuidV4::new();
        let newest = WrappedUuidV4::new();
        seed_video(&conn, &oldest, "oldest", "2026-02-01 10:00:00.000").await;
        seed_video(&conn, &middle, "middle", "2026-02-02 10:00:00.000").await;
        seed_video(&conn, &newest, "newest", "2026-02-03 10:00:00.000").await;

        let videos = list_videos(&repo).await.unwrap();
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].id, newest);
        assert_eq!(videos[1].id, middle);
        assert_eq!(videos[2].id, oldest);
    }
}
