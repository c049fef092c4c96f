use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nearest_bite_server::{
    types::dto::geom::OriginQueryError, PipelineError, ResolutionError, Stage,
};
use serde::Serialize;

pub struct ResponseError(Response);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<Stage>,
}

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        self.0
    }
}

impl From<color_eyre::Report> for ResponseError {
    fn from(value: color_eyre::Report) -> Self {
        tracing::error!("{value:?}");
        Self::internal_server_error(value.to_string())
    }
}

impl From<OriginQueryError> for ResponseError {
    fn from(value: OriginQueryError) -> Self {
        Self::with_body(StatusCode::BAD_REQUEST, value.to_string(), "invalid_query", None)
    }
}

/// Unparseable query strings (`lat=abc`) get the same JSON shape as other bad queries
impl From<QueryRejection> for ResponseError {
    fn from(value: QueryRejection) -> Self {
        Self::with_body(StatusCode::BAD_REQUEST, value.body_text(), "invalid_query", None)
    }
}

impl ResponseError {
    fn with_body(
        status_code: StatusCode,
        error: String,
        reason: &'static str,
        stage: Option<Stage>,
    ) -> Self {
        ResponseError(
            (
                status_code,
                Json(ErrorBody {
                    error,
                    reason,
                    stage,
                }),
            )
                .into_response(),
        )
    }

    pub fn internal_server_error(error: String) -> Self {
        Self::with_body(StatusCode::INTERNAL_SERVER_ERROR, error, "internal", None)
    }

    /// One user-facing message per pipeline failure, tagged with reason and stage
    pub fn pipeline(error: PipelineError, category_label: &str) -> Self {
        let status_code = match &error {
            PipelineError::Resolve(ResolutionError::NotFound) | PipelineError::NoMatch { .. } => {
                StatusCode::NOT_FOUND
            }
            PipelineError::Resolve(_) | PipelineError::Search(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::with_body(
            status_code,
            error.user_message(category_label),
            error.reason(),
            Some(error.stage()),
        )
    }
}

pub type Result<T, E = ResponseError> = axum::response::Result<T, E>;
