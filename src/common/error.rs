use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
// Os handlers convertem para `ApiError` (com mensagem localizada) via
// `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Registro duplicado ({0})")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário bloqueado")]
    UserBlocked,

    #[error("Registro não encontrado")]
    NotFound,

    #[error("Sem permissão")]
    PermissionDenied,

    // O código orçamentário precisa estar associado ao laboratório da solicitação
    #[error("Código orçamentário não pertence ao laboratório")]
    BudgetCodeNotInLaboratory,

    #[error("Transição de status inválida: {0}")]
    InvalidStatusTransition(String),

    // Rejeição de viagem exige justificativa não vazia
    #[error("Notas obrigatórias")]
    NotesRequired,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Anexos: falhas de disco ao gravar/ler/apagar objetos
    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // (status HTTP, chave de mensagem no catálogo i18n)
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_exists"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "already_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::UserBlocked => (StatusCode::FORBIDDEN, "user_blocked"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, "permission_denied"),
            AppError::BudgetCodeNotInLaboratory => (StatusCode::CONFLICT, "budget_code_not_in_lab"),
            AppError::InvalidStatusTransition(_) => (StatusCode::CONFLICT, "invalid_transition"),
            AppError::NotesRequired => (StatusCode::BAD_REQUEST, "notes_required"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    // Converte para o erro de API com a mensagem no idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log; o cliente recebe a mensagem genérica.
            tracing::error!("Erro interno do servidor: {:?}", self);
        }

        // Validação retorna todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            return ApiError {
                status,
                error: store.message(&locale.0, key).to_string(),
                details: Some(json!(details)),
            };
        }

        ApiError {
            status,
            error: store.message(&locale.0, key).to_string(),
            details: None,
        }
    }
}

// Erros que escapam antes dos handlers (middleware, extratores) saem sem
// negociação de idioma: usam o catálogo em espanhol.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, key) = self.status_and_key();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro interno do servidor: {:?}", self);
        }
        let store = I18nStore::new();
        let body = Json(json!({ "error": store.message("es", key) }));
        (status, body).into_response()
    }
}

// ---
// ApiError: a forma final que chega ao cliente
// ---
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.error, "details": details })),
            None => Json(json!({ "error": self.error })),
        };
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_vira_403_localizado() {
        let store = I18nStore::new();
        let api = AppError::PermissionDenied.to_api_error(&Locale("es".into()), &store);
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.error, store.message("es", "permission_denied"));
    }

    #[test]
    fn violacao_de_unicidade_vira_409() {
        let api = AppError::UniqueConstraintViolation("suppliers_name_key".into())
            .to_api_error(&Locale("en".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::CONFLICT);
    }

    #[test]
    fn erro_de_validacao_carrega_detalhes_por_campo() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("length");
        err.message = Some("El producto es obligatorio.".into());
        errors.add("productId", err);

        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale("es".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes presentes");
        assert!(details["productId"][0]
            .as_str()
            .unwrap()
            .contains("obligatorio"));
    }
}
