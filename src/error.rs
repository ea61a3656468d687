//! Erreurs de l'API et leur conversion en réponses HTTP JSON.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    /// Champ manquant ou invalide (400)
    #[error("{0}")]
    Validation(String),

    /// Échec de validation d'un DTO (400)
    #[error("Invalid request")]
    InvalidInput(#[from] ValidationErrors),

    /// Token absent ou invalide, mauvais identifiants (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Rôle ou périmètre insuffisant (403)
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Visite déjà active, email déjà utilisé (409)
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Convertit une violation de contrainte unique en Conflict, le reste en erreur BD
    pub fn conflict_on_unique(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(message.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::InvalidInput(errors) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string(),
                "fields": errors
            })),
            Self::Database(_) | Self::Internal(_) => {
                // Le détail reste dans les logs, jamais dans la réponse
                tracing::error!(error = %self, "request failed");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.to_string()
            })),
        }
    }
}
