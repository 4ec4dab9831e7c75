// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda falha é terminal para a requisição: nada aqui é "retryável".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Campo obrigatório ausente no corpo da requisição.
    #[error("Campos obrigatórios: {0}")]
    MissingFields(&'static str),

    #[error("E-mail já está em uso")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Proposta não encontrada")]
    ProposalNotFound,

    #[error("Reunião não encontrada")]
    MeetingNotFound,

    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Lead já foi convertido em proposta")]
    LeadAlreadyConverted,

    #[error("Não é possível excluir seu próprio usuário")]
    CannotDeleteSelf,

    // Variante genérica para qualquer outro erro inesperado.
    #[error(transparent)]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::MissingFields(fields) => {
                let body = Json(json!({ "error": format!("Campos obrigatórios: {}", fields) }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "E-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.")
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Acesso negado."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::ProposalNotFound => (StatusCode::NOT_FOUND, "Proposta não encontrada."),
            AppError::MeetingNotFound => (StatusCode::NOT_FOUND, "Reunião não encontrada."),
            AppError::LeadNotFound => (StatusCode::NOT_FOUND, "Lead não encontrado."),
            AppError::LeadAlreadyConverted => {
                (StatusCode::BAD_REQUEST, "Lead já foi convertido em proposta.")
            }
            AppError::CannotDeleteSelf => {
                (StatusCode::BAD_REQUEST, "Não é possível excluir seu próprio usuário.")
            }

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
