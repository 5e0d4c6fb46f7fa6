use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::{IntoResponses, PartialSchema, ToSchema};

#[derive(Error, Debug, Serialize)]
pub enum CommonError {
    #[error("could not find resource")]
    NotFound {
        msg: String,
        lookup_id: String,
        #[serde(skip)]
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("invalid request")]
    InvalidRequest {
        msg: String,
        #[serde(skip)]
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("repository error")]
    Repository {
        msg: String,
        #[serde(skip)]
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("store error")]
    SqliteError {
        #[serde(skip)]
        #[from]
        #[source]
        source: libsql::Error,
    },
    #[error("unknown error")]
    Unknown(
        #[serde(skip)]
        #[from]
        anyhow::Error,
    ),
    #[error("io error")]
    IoError {
        #[serde(skip)]
        #[from]
        #[source]
        source: std::io::Error,
    },
    #[error("url parse error")]
    UrlParseError {
        #[serde(skip)]
        #[from]
        #[source]
        source: url::ParseError,
    },
    #[error("serde json error")]
    SerdeSerializationError {
        #[serde(skip)]
        #[from]
        #[source]
        source: serde_json::Error,
    },
    #[error("address parse error")]
    AddrParseError {
        #[serde(skip)]
        #[from]
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("var error")]
    VarError {
        #[serde(skip)]
        #[from]
        #[source]
        source: std::env::VarError,
    },
}

impl CommonError {
    fn status(&self) -> StatusCode {
        match self {
            CommonError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommonError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            CommonError::Repository { .. }
            | CommonError::SqliteError { .. }
            | CommonError::Unknown(_)
            | CommonError::IoError { .. }
            | CommonError::UrlParseError { .. }
            | CommonError::SerdeSerializationError { .. }
            | CommonError::AddrParseError { .. }
            | CommonError::VarError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CommonError::NotFound { .. } => "NotFound",
            CommonError::InvalidRequest { .. } => "InvalidRequest",
            CommonError::Repository { .. } => "Repository",
            CommonError::SqliteError { .. }
            | CommonError::Unknown(_)
            | CommonError::IoError { .. }
            | CommonError::UrlParseError { .. }
            | CommonError::SerdeSerializationError { .. }
            | CommonError::AddrParseError { .. }
            | CommonError::VarError { .. } => "InternalServerError",
        }
    }

    /// Message surfaced to clients, richer than the top-level `#[error]`
    /// text where the variant carries one.
    fn message(&self) -> String {
        match self {
            CommonError::NotFound { msg, .. }
            | CommonError::InvalidRequest { msg, .. }
            | CommonError::Repository { msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl ToSchema for CommonError {
    fn name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("Error")
    }

    fn schemas(
        _schemas: &mut Vec<(
            String,
            utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
        )>,
    ) {
        // nothing by default
    }
}

impl PartialSchema for CommonError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .property(
                "name",
                utoipa::openapi::ObjectBuilder::new()
                    .schema_type(utoipa::openapi::schema::Type::String),
            )
            .required("name")
            .property(
                "error",
                utoipa::openapi::ObjectBuilder::new()
                    .schema_type(utoipa::openapi::schema::Type::String),
            )
            .required("error")
            .into()
    }
}

impl IntoResponses for CommonError {
    fn responses() -> std::collections::BTreeMap<
        String,
        utoipa::openapi::RefOr<utoipa::openapi::response::Response>,
    > {
        let mut responses = std::collections::BTreeMap::new();

        let error_content = utoipa::openapi::ContentBuilder::new()
            .schema(Some(CommonError::schema()))
            .build();

        responses.insert(
            "400".to_string(),
            utoipa::openapi::ResponseBuilder::new()
                .description("Invalid request")
                .content("application/json", error_content.clone())
                .into(),
        );

        responses.insert(
            "404".to_string(),
            utoipa::openapi::ResponseBuilder::new()
                .description("Resource not found")
                .content("application/json", error_content.clone())
                .into(),
        );

        responses.insert(
            "500".to_string(),
            utoipa::openapi::ResponseBuilder::new()
                .description("Server error")
                .content("application/json", error_content)
                .into(),
        );

        responses
    }
}

impl IntoResponse for CommonError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(ErrorResponse {
            name: self.name().to_string(),
            error: self.message(),
        });

        (status, body).into_response()
    }
}

/// Wire shape of every error response: an `error` message plus the
/// error name for programmatic matching.
#[derive(Serialize)]
pub struct ErrorResponse {
    name: String,
    error: String,
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = CommonError::NotFound {
            msg: "video not found".to_string(),
            lookup_id: "abc".to_string(),
            source: None,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_request_maps_to_400() {
        let err = CommonError::InvalidRequest {
            msg: "bad body".to_string(),
            source: None,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_map_to_500() {
        let err = CommonError::Repository {
            msg: "insert failed".to_string(),
            source: None,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = CommonError::Unknown(anyhow::anyhow!("boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
