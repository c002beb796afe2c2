// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::User,
        profile::{Profile, Role},
    },
};

// Usuário autenticado + perfil + papel, inserido nos extensions pelo
// middleware. O perfil vem junto porque quase todo handler precisa dele
// (papel, bloqueio, laboratório).
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub profile: Profile,
    pub role: Role,
}

// O middleware em si: exige Bearer token válido em todas as rotas protegidas.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let (user, profile, role) = app_state.auth_service.validate_token(token).await?;

            // Insere o usuário nos "extensions" da requisição
            request
                .extensions_mut()
                .insert(AuthenticatedUser {
                    user,
                    profile,
                    role,
                });
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
