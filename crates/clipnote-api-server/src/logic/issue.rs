use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shared::{
    error::CommonError,
    primitives::{WrappedChronoDateTime, WrappedUuidV4},
};
use utoipa::ToSchema;

use crate::repository::{CreateIssue, IssueRepositoryLike, UpdateIssue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(anyhow::anyhow!("unknown severity: {other}")),
        }
    }
}

// Domain model for Issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Issue {
    pub id: WrappedUuidV4,
    pub video_id: WrappedUuidV4,
    pub description: String,
    /// Seconds offset into the owning video.
    pub timestamp: f64,
    pub severity: Severity,
    pub resolved: bool,
    pub created_at: WrappedChronoDateTime,
}

// Request/Response types
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct CreateIssueRequest {
    pub description: String,
    pub timestamp: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct UpdateIssueRequest {
    pub description: String,
    pub timestamp: f64,
    pub severity: Severity,
    pub resolved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct DeleteIssueResponse {
    pub message: String,
}

// CRUD functions
pub async fn create_issue<R: IssueRepositoryLike>(
    repository: &R,
    video_id: WrappedUuidV4,
    request: CreateIssueRequest,
) -> Result<Issue, CommonError> {
    let now = WrappedChronoDateTime::now();
    let id = WrappedUuidV4::new();

    let issue = Issue {
        id: id.clone(),
        video_id: video_id.clone(),
        description: request.description.clone(),
        timestamp: request.timestamp,
        severity: request.severity,
        resolved: false,
        created_at: now,
    };

    let create_params = CreateIssue {
        id,
        video_id,
        description: request.description,
        timestamp: request.timestamp,
        severity: request.severity,
        resolved: false,
        created_at: now,
    };

    repository.create_issue(&create_params).await?;

    Ok(issue)
}

/// Issues for one video, ordered by their position in the video.
pub async fn list_issues_for_video<R: IssueRepositoryLike>(
    repository: &R,
    video_id: WrappedUuidV4,
) -> Result<Vec<Issue>, CommonError> {
    repository.get_issues_by_video_id(&video_id).await
}

pub async fn update_issue<R: IssueRepositoryLike>(
    repository: &R,
    id: WrappedUuidV4,
    request: UpdateIssueRequest,
) -> Result<Issue, CommonError> {
    let existing = repository.get_issue_by_id(&id).await?;
    let existing = existing.ok_or_else(|| CommonError::NotFound {
        msg: format!("Issue with id {id} not found"),
        lookup_id: id.to_string(),
        source: None,
    })?;

    let update_params = UpdateIssue {
        id: id.clone(),
        description: request.description.clone(),
        timestamp: request.timestamp,
        severity: request.severity,
        resolved: request.resolved,
    };

    repository.update_issue(&update_params).await?;

    // id, video_id and created_at are never touched by an update
    Ok(Issue {
        id,
        video_id: existing.video_id,
        description: request.description,
        timestamp: request.timestamp,
        severity: request.severity,
        resolved: request.resolved,
        created_at: existing.created_at,
    })
}

pub async fn delete_issue<R: IssueRepositoryLike>(
    repository: &R,
    id: WrappedUuidV4,
) -> Result<DeleteIssueResponse, CommonError> {
    let affected = repository.delete_issue(&id).await?;
    if affected == 0 {
        return Err(CommonError::NotFound {
            msg: format!("Issue with id {id} not found"),
            lookup_id: id.to_string(),
            source: None,
        });
    }

    Ok(DeleteIssueResponse {
        message: "Issue deleted successfully".to_string(),
    })
}
