// src/handlers/purchases.rs
//
// Fluxo de solicitações de compra. Criar/editar/comentar é de qualquer
// usuário autenticado; mudar status e excluir é da equipe de compras.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireRole, rbac::RoleCompras},
    models::purchases::{
        CreateCommentPayload, PurchaseListParams, PurchaseRequestComment, PurchaseRequestDetail,
        PurchaseRequestPayload, PurchaseRequestSummary, UpdatePurchaseStatusPayload,
    },
    services::purchase_service::UploadedFile,
};

// POST /api/purchases
#[utoipa::path(
    post,
    path = "/api/purchases",
    tag = "Purchases",
    request_body = PurchaseRequestPayload,
    responses(
        (status = 201, description = "Solicitação criada com o item"),
        (status = 409, description = "Código orçamentário fora do laboratório")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Json(payload): Json<PurchaseRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (request, item) = app_state
        .purchase_service
        .create_request(auth.user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "request": request, "item": item })),
    ))
}

// GET /api/purchases?status=...&search=...
#[utoipa::path(
    get,
    path = "/api/purchases",
    tag = "Purchases",
    params(PurchaseListParams),
    responses((status = 200, body = [PurchaseRequestSummary])),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<PurchaseListParams>,
) -> Result<Json<Vec<PurchaseRequestSummary>>, ApiError> {
    let summaries = app_state
        .purchase_service
        .list_requests(params.status, params.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(summaries))
}

// GET /api/purchases/{id}
#[utoipa::path(
    get,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = PurchaseRequestDetail), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<PurchaseRequestDetail>, ApiError> {
    let detail = app_state
        .purchase_service
        .get_detail(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(detail))
}

// PUT /api/purchases/{id}
#[utoipa::path(
    put,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    request_body = PurchaseRequestPayload,
    responses(
        (status = 200, description = "Solicitação atualizada; o solicitante é notificado dos campos alterados"),
        (status = 404)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_request(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PurchaseRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (request, item) = app_state
        .purchase_service
        .update_request(id, auth.user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "request": request, "item": item })))
}

// PUT /api/purchases/{id}/status
#[utoipa::path(
    put,
    path = "/api/purchases/{id}/status",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    request_body = UpdatePurchaseStatusPayload,
    responses(
        (status = 200, description = "Status alterado e solicitante notificado"),
        (status = 403, description = "Apenas a equipe de compras")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<RoleCompras>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .purchase_service
        .update_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(request))
}

// DELETE /api/purchases/{id}
#[utoipa::path(
    delete,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Soft delete"), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<RoleCompras>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .purchase_service
        .delete_request(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ANEXOS
// =============================================================================

// POST /api/purchases/{id}/attachments (multipart)
#[utoipa::path(
    post,
    path = "/api/purchases/{id}/attachments",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Anexos gravados; arquivos com falha são pulados")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_attachments(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let files = read_multipart_files(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let saved = app_state
        .purchase_service
        .upload_attachments(id, auth.user.id, files)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(saved)))
}

// GET /api/purchases/attachments/{id}
#[utoipa::path(
    get,
    path = "/api/purchases/attachments/{id}",
    tag = "Purchases",
    params(("id" = Uuid, Path, description = "ID do anexo")),
    responses(
        (status = 200, description = "Conteúdo do arquivo"),
        (status = 404)
    ),
    security(("api_jwt" = []))
)]
pub async fn download_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (attachment, bytes) = app_state
        .purchase_service
        .download_attachment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(file_response(
        &attachment.file_name,
        attachment.content_type.as_deref(),
        bytes,
    ))
}

// DELETE /api/purchases/attachments/{id}
#[utoipa::path(
    delete,
    path = "/api/purchases/attachments/{id}",
    tag = "Purchases",
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
        .purchase_service
        .delete_attachment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  COMENTÁRIOS
// =============================================================================

// POST /api/purchases/{id}/comments
#[utoipa::path(
    post,
    path = "/api/purchases/{id}/comments",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    request_body = CreateCommentPayload,
    responses((status = 201, body = PurchaseRequestComment), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn add_comment(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let comment = app_state
        .purchase_service
        .add_comment(id, auth.user.id, &payload.body)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

// GET /api/purchases/{id}/comments
#[utoipa::path(
    get,
    path = "/api/purchases/{id}/comments",
    tag = "Purchases",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = [PurchaseRequestComment])),
    security(("api_jwt" = []))
)]
pub async fn list_comments(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PurchaseRequestComment>>, ApiError> {
    let comments = app_state
        .purchase_service
        .list_comments(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(comments))
}

// ---
// Helpers compartilhados com o handler de viagens
// ---

// Lê todos os campos de arquivo do multipart para a memória.
pub(crate) async fn read_multipart_files(
    mut multipart: Multipart,
) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("Multipart inválido: {}", e))?
    {
        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            // Campos que não são arquivo são ignorados
            None => continue,
        };
        let content_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| anyhow::anyhow!("Falha lendo o arquivo '{}': {}", file_name, e))?;

        files.push(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(files)
}

// `use<>`: a resposta é dona dos headers; sem isso o retorno capturaria os
// empréstimos dos parâmetros e os chamadores não poderiam devolvê-la.
pub(crate) fn file_response(
    file_name: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> impl IntoResponse + use<> {
    let headers = [
        (
            header::CONTENT_TYPE,
            content_type.unwrap_or("application/octet-stream").to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];
    (headers, bytes)
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::file_response;

    // A resposta precisa sobreviver ao escopo do nome do arquivo emprestado,
    // como acontece nos handlers de download.
    fn resposta_de_anexo() -> axum::response::Response {
        let nome = String::from("informe.pdf");
        file_response(&nome, Some("application/pdf"), b"%PDF-1.4".to_vec()).into_response()
    }

    #[test]
    fn resposta_de_download_carrega_headers_de_anexo() {
        let resposta = resposta_de_anexo();
        let headers = resposta.headers();
        assert_eq!(headers["content-type"], "application/pdf");
        assert_eq!(
            headers["content-disposition"],
            "attachment; filename=\"informe.pdf\""
        );
    }

    #[test]
    fn download_sem_content_type_usa_octet_stream() {
        let nome = String::from("dados.bin");
        let resposta = file_response(&nome, None, vec![1, 2, 3]).into_response();
        assert_eq!(resposta.headers()["content-type"], "application/octet-stream");
    }
}
