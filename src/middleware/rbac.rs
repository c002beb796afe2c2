// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser};

/// 1. O Trait que define o que é um Papel exigido
pub trait RoleDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião): exige que o perfil tenha o papel `T`.
/// Administradores passam por qualquer checagem de papel.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if auth.profile.is_admin || auth.role.slug == T::slug() {
            return Ok(RequireRole(PhantomData));
        }

        Err(AppError::PermissionDenied)
    }
}

/// Guardião só de administradores (gestão de usuários).
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if auth.profile.is_admin {
            return Ok(RequireAdmin);
        }

        Err(AppError::PermissionDenied)
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

// Equipe de compras: processa solicitações e muda status
pub struct RoleCompras;
impl RoleDef for RoleCompras {
    fn slug() -> &'static str {
        "compras"
    }
}
