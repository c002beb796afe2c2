// src/handlers/travel.rs
//
// Fluxo de solicitações de viagem: aprovação em dois níveis, despesas e
// anexos (recibos e documentos).

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequireRole, RoleCompras},
    },
    models::travel::{
        ApproveTravelPayload, CreateExpensePayload, RejectTravelPayload, TravelAttachmentKind,
        TravelListParams, TravelRequest, TravelRequestDetail, TravelRequestExpense,
        TravelRequestPayload,
    },
};

use super::purchases::{file_response, read_multipart_files};

// POST /api/travel
#[utoipa::path(
    post,
    path = "/api/travel",
    tag = "Travel",
    request_body = TravelRequestPayload,
    responses(
        (status = 201, body = TravelRequest),
        (status = 400, description = "Datas invertidas ou presupuesto inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Json(payload): Json<TravelRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state
        .travel_service
        .create_request(auth.user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/travel?status=...&search=...
#[utoipa::path(
    get,
    path = "/api/travel",
    tag = "Travel",
    params(TravelListParams),
    responses((status = 200, body = [TravelRequest])),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<TravelListParams>,
) -> Result<Json<Vec<TravelRequest>>, ApiError> {
    let requests = app_state
        .travel_service
        .list_requests(params.status, params.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(requests))
}

// GET /api/travel/{id}
#[utoipa::path(
    get,
    path = "/api/travel/{id}",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = TravelRequestDetail), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelRequestDetail>, ApiError> {
    let detail = app_state
        .travel_service
        .get_detail(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(detail))
}

// PUT /api/travel/{id}
#[utoipa::path(
    put,
    path = "/api/travel/{id}",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    request_body = TravelRequestPayload,
    responses((status = 200, body = TravelRequest), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<TravelRequestPayload>,
) -> Result<Json<TravelRequest>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state
        .travel_service
        .update_request(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(request))
}

// DELETE /api/travel/{id}
#[utoipa::path(
    delete,
    path = "/api/travel/{id}",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Soft delete"), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .travel_service
        .delete_request(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  TRANSIÇÕES DE STATUS
// =============================================================================

// PUT /api/travel/{id}/approve
#[utoipa::path(
    put,
    path = "/api/travel/{id}/approve",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    request_body = ApproveTravelPayload,
    responses(
        (status = 200, description = "Avança um estágio: pendiente -> gerente -> finanzas", body = TravelRequest),
        (status = 403, description = "Exige papel 'compras' ou admin"),
        (status = 409, description = "Status não permite aprovação")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_request(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _role: RequireRole<RoleCompras>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveTravelPayload>,
) -> Result<Json<TravelRequest>, ApiError> {
    let request = app_state
        .travel_service
        .approve(id, auth.user.id, payload.notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(request))
}

// PUT /api/travel/{id}/reject
#[utoipa::path(
    put,
    path = "/api/travel/{id}/reject",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    request_body = RejectTravelPayload,
    responses(
        (status = 200, body = TravelRequest),
        (status = 400, description = "Justificativa obrigatória"),
        (status = 403, description = "Exige papel 'compras' ou admin"),
        (status = 409, description = "Status não permite rejeição")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_request(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _role: RequireRole<RoleCompras>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectTravelPayload>,
) -> Result<Json<TravelRequest>, ApiError> {
    let request = app_state
        .travel_service
        .reject(id, auth.user.id, payload.notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(request))
}

// PUT /api/travel/{id}/complete
#[utoipa::path(
    put,
    path = "/api/travel/{id}/complete",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, body = TravelRequest),
        (status = 403, description = "Exige papel 'compras' ou admin"),
        (status = 409, description = "Só viagens aprovadas por finanças podem ser encerradas")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_request(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _role: RequireRole<RoleCompras>,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelRequest>, ApiError> {
    let request = app_state
        .travel_service
        .complete(id, auth.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(request))
}

// =============================================================================
//  DESPESAS
// =============================================================================

// POST /api/travel/{id}/expenses
#[utoipa::path(
    post,
    path = "/api/travel/{id}/expenses",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    request_body = CreateExpensePayload,
    responses((status = 201, body = TravelRequestExpense), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn add_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let expense = app_state
        .travel_service
        .add_expense(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::CREATED, Json(expense)))
}

// GET /api/travel/{id}/expenses
#[utoipa::path(
    get,
    path = "/api/travel/{id}/expenses",
    tag = "Travel",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = [TravelRequestExpense])),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TravelRequestExpense>>, ApiError> {
    let expenses = app_state
        .travel_service
        .list_expenses(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(expenses))
}

// =============================================================================
//  ANEXOS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttachmentKindParams {
    // receipt | document; define o bucket de destino
    pub kind: TravelAttachmentKind,
}

// POST /api/travel/{id}/attachments?kind=receipt (multipart)
#[utoipa::path(
    post,
    path = "/api/travel/{id}/attachments",
    tag = "Travel",
    params(("id" = Uuid, Path), AttachmentKindParams),
    request_body(content_type = "multipart/form-data"),
    responses((status = 201, description = "Anexos gravados")),
    security(("api_jwt" = []))
)]
pub async fn upload_attachments(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(params): Query<AttachmentKindParams>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let files = read_multipart_files(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let saved = app_state
        .travel_service
        .upload_attachments(id, auth.user.id, params.kind, files)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(saved)))
}

// GET /api/travel/attachments/{id}
#[utoipa::path(
    get,
    path = "/api/travel/attachments/{id}",
    tag = "Travel",
    params(("id" = Uuid, Path, description = "ID do anexo")),
    responses((status = 200, description = "Conteúdo do arquivo"), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn download_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (attachment, bytes) = app_state
        .travel_service
        .download_attachment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(file_response(
        &attachment.file_name,
        attachment.content_type.as_deref(),
        bytes,
    ))
}

// DELETE /api/travel/attachments/{id}
#[utoipa::path(
    delete,
    path = "/api/travel/attachments/{id}",
    tag = "Travel",
    params(("id" = Uuid, Path, description = "ID do anexo")),
    responses((status = 204), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .travel_service
        .delete_attachment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}
