// src/handlers/users.rs
//
// Rotas do próprio usuário: /me, área selecionada e notificações.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        notifications::Notification,
        profile::{MeResponse, Profile, SelectAreaPayload},
    },
};

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado", body = MeResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(auth: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.user.id,
        email: auth.user.email,
        profile: auth.profile,
        role: auth.role,
    })
}

// PUT /api/users/me/area
#[utoipa::path(
    put,
    path = "/api/users/me/area",
    tag = "Users",
    request_body = SelectAreaPayload,
    responses(
        (status = 200, description = "Área selecionada", body = Profile)
    ),
    security(("api_jwt" = []))
)]
pub async fn select_area(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Json(payload): Json<SelectAreaPayload>,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state
        .profile_repo
        .set_selected_area(auth.user.id, payload.area.as_str())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(profile))
}

// GET /api/users/me/notifications
#[utoipa::path(
    get,
    path = "/api/users/me/notifications",
    tag = "Users",
    responses(
        (status = 200, description = "Notificações do usuário", body = [Notification])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = app_state
        .notification_repo
        .list_for_user(auth.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(notifications))
}

// PUT /api/users/me/notifications/{id}/read
#[utoipa::path(
    put,
    path = "/api/users/me/notifications/{id}/read",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação marcada como lida", body = Notification),
        (status = 404, description = "Notificação de outro usuário ou inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let notification = app_state
        .notification_repo
        .mark_read(id, auth.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(notification))
}
