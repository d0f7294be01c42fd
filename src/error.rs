use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Application error type. Every failure surface renders the same JSON body
/// shape; the two redirect-based exceptions (missing session, login form
/// messages) never go through this type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string())
            }
            AppError::Template(e) => {
                tracing::error!(error = %e, "template render error");
                (StatusCode::INTERNAL_SERVER_ERROR, "render error".to_string())
            }
            AppError::Io(e) => {
                tracing::error!(error = %e, "io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "io error".to_string())
            }
            AppError::Session(e) => {
                tracing::error!(error = %e, "session error");
                (StatusCode::INTERNAL_SERVER_ERROR, "session error".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        let body = Json(ErrorBody {
            status: "error",
            message,
        });
        (status, body).into_response()
    }
}

/// What a handler intends to answer with. Handlers return this instead of
/// assembling raw responses so the response surface stays uniform.
pub enum Reply {
    Redirect(String),
    Html(String),
    Json(StatusCode, serde_json::Value),
}

impl Reply {
    /// Render a template into an HTML reply.
    pub fn page<T: Template>(template: &T) -> Result<Reply, AppError> {
        Ok(Reply::Html(template.render()?))
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Redirect(to) => Redirect::to(&to).into_response(),
            Reply::Html(body) => Html(body).into_response(),
            Reply::Json(status, value) => (status, Json(value)).into_response(),
        }
    }
}
