//! Maps [`AppError`] onto HTTP responses.
//!
//! Every error body is `{"erro": "<message>"}`. Internal errors are logged
//! in full and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppError;

const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "erro")]
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(_) => {
                tracing::debug!("Validation error: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Conflict(_) => {
                tracing::warn!("Conflict: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            AppError::Internal(err) => {
                tracing::error!("Internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::error::{Conflict, Resource};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let response = AppError::Validation("Nome e email são obrigatórios").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"erro": "Nome e email são obrigatórios"})
        );
    }

    #[tokio::test]
    async fn conflict_is_400() {
        let response = AppError::Conflict(Conflict::AlreadyEnrolled).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = AppError::NotFound(Resource::Student).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"erro": "Aluno não encontrado"})
        );
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let err = AppError::Internal(DbError::Sqlite(rusqlite::Error::InvalidQuery));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"erro": "Erro interno do servidor"})
        );
    }
}
