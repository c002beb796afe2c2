// src/handlers/admin.rs
//
// Painel de administração de usuários. Todas as rotas exigem a flag de
// admin, via o guardião RequireAdmin.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, rbac::RequireAdmin},
    models::profile::{
        AdminUserRow, Profile, Role, SetAdminPayload, SetBlockedPayload, SetLaboratoryPayload,
        SetRolePayload,
    },
};

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Todos os usuários com perfil e papel", body = [AdminUserRow]),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
) -> Result<Json<Vec<AdminUserRow>>, ApiError> {
    let users = app_state
        .admin_service
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(users))
}

// GET /api/admin/roles
#[utoipa::path(
    get,
    path = "/api/admin/roles",
    tag = "Admin",
    responses((status = 200, description = "Papéis disponíveis", body = [Role])),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Role>>, ApiError> {
    let roles = app_state
        .admin_service
        .list_roles()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(roles))
}

// PUT /api/admin/users/{id}/blocked
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/blocked",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = SetBlockedPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = Profile),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_blocked(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetBlockedPayload>,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state
        .admin_service
        .set_blocked(id, payload.is_blocked)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(profile))
}

// PUT /api/admin/users/{id}/admin
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/admin",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = SetAdminPayload,
    responses(
        (status = 200, description = "Perfil atualizado; rebaixar devolve o papel padrão", body = Profile)
    ),
    security(("api_jwt" = []))
)]
pub async fn set_admin(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAdminPayload>,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state
        .admin_service
        .set_admin(id, payload.is_admin)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(profile))
}

// PUT /api/admin/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = SetRolePayload,
    responses(
        (status = 200, description = "Papel atualizado", body = Profile),
        (status = 404, description = "Papel ou usuário inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRolePayload>,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state
        .admin_service
        .set_role(id, payload.role_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(profile))
}

// PUT /api/admin/users/{id}/laboratory
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/laboratory",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = SetLaboratoryPayload,
    responses(
        (status = 200, description = "Laboratório atribuído (ou desvinculado com null)", body = Profile)
    ),
    security(("api_jwt" = []))
)]
pub async fn set_laboratory(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetLaboratoryPayload>,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state
        .admin_service
        .set_laboratory(id, payload.laboratory_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(profile))
}
