use shared::{error::CommonError, primitives::WrappedChronoDateTime};

use crate::logic::issue::{Issue, Severity};
use crate::logic::task::{Task, TaskStatus, TaskWithVideo};
use crate::logic::video::Video;

fn real_from_value(value: libsql::Value) -> Result<f64, CommonError> {
    match value {
        libsql::Value::Real(v) => Ok(v),
        libsql::Value::Integer(v) => Ok(v as f64),
        other => Err(CommonError::Repository {
            msg: format!("expected numeric column, got {other:?}"),
            source: None,
        }),
    }
}

fn bool_from_value(value: libsql::Value) -> Result<bool, CommonError> {
    match value {
        libsql::Value::Integer(v) => Ok(v != 0),
        other => Err(CommonError::Repository {
            msg: format!("expected boolean column, got {other:?}"),
            source: None,
        }),
    }
}

fn optional_datetime_from_value(
    value: libsql::Value,
) -> Result<Option<WrappedChronoDateTime>, CommonError> {
    match value {
        libsql::Value::Null => Ok(None),
        libsql::Value::Text(s) => WrappedChronoDateTime::try_from(s.as_str())
            .map(Some)
            .map_err(|e| CommonError::Repository {
                msg: format!("invalid datetime column: {e}"),
                source: Some(e),
            }),
        other => Err(CommonError::Repository {
            msg: format!("expected datetime column, got {other:?}"),
            source: None,
        }),
    }
}

fn severity_from_text(s: String) -> Result<Severity, CommonError> {
    s.parse::<Severity>().map_err(|e| CommonError::Repository {
        msg: format!("invalid severity column: {e}"),
        source: Some(e),
    })
}

fn status_from_text(s: String) -> Result<TaskStatus, CommonError> {
    s.parse::<TaskStatus>().map_err(|e| CommonError::Repository {
        msg: format!("invalid status column: {e}"),
        source: Some(e),
    })
}

// Column order follows the SELECT lists in the repository queries.

impl TryFrom<&libsql::Row> for Video {
    type Error = CommonError;
    fn try_from(row: &libsql::Row) -> Result<Self, Self::Error> {
        Ok(Video {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl TryFrom<&libsql::Row> for Issue {
    type Error = CommonError;
    fn try_from(row: &libsql::Row) -> Result<Self, Self::Error> {
        Ok(Issue {
            id: row.get(0)?,
            video_id: row.get(1)?,
            description: row.get(2)?,
            timestamp: real_from_value(row.get_value(3)?)?,
            severity: severity_from_text(row.get(4)?)?,
            resolved: bool_from_value(row.get_value(5)?)?,
            created_at: row.get(6)?,
        })
    }
}

impl TryFrom<&libsql::Row> for Task {
    type Error = CommonError;
    fn try_from(row: &libsql::Row) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.get(0)?,
            video_id: row.get(1)?,
            description: row.get(2)?,
            status: status_from_text(row.get(3)?)?,
            completed_at: optional_datetime_from_value(row.get_value(4)?)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<&libsql::Row> for TaskWithVideo {
    type Error = CommonError;
    fn try_from(row: &libsql::Row) -> Result<Self, Self::Error> {
        Ok(TaskWithVideo {
            id: row.get(0)?,
            video_id: row.get(1)?,
            description: row.get(2)?,
            status: status_from_text(row.get(3)?)?,
            completed_at: optional_datetime_from_value(row.get_value(4)?)?,
            created_at: row.get(5)?,
            video: Video {
                id: row.get(6)?,
                title: row.get(7)?,
                url: row.get(8)?,
                created_at: row.get(9)?,
            },
        })
    }
}
