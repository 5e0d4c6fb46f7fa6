use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shared::error::CommonError;
use utoipa::ToSchema;

use crate::repository::Repository;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness: verifies the store connection answers a trivial query.
pub async fn check_health(repository: &Repository) -> Result<HealthResponse, CommonError> {
    repository.ping().await?;
    Ok(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod unit_test {
    use super::*;
    use shared::primitives::SqlMigrationLoader;
    use shared::test_utils::repository::setup_in_memory_database;

    #[tokio::test]
    async fn test_check_health_ok() {
        let (_db, conn) = setup_in_memory_database(Repository::load_sql_migrations())
            .await
            .unwrap();
        let repo = Repository::new(conn);

        let response = check_health(&repo).await.unwrap();
        assert_eq!(response.status, "ok");
    }
}
