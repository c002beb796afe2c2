// src/handlers/masterdata.rs
//
// CRUD de dados mestres: laboratórios, fornecedores, produtos, códigos
// orçamentários e as associações N:N entre eles.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::masterdata::{
        BudgetCode, BudgetCodePayload, Laboratory, LaboratoryPayload, Product, ProductListParams,
        ProductPayload, ProductWithSupplier, ReplaceBudgetCodesPayload, ReplaceProductsPayload,
        Supplier, SupplierPayload,
    },
};

// =============================================================================
//  LABORATÓRIOS
// =============================================================================

// GET /api/masterdata/laboratories
#[utoipa::path(
    get,
    path = "/api/masterdata/laboratories",
    tag = "MasterData",
    responses((status = 200, body = [Laboratory])),
    security(("api_jwt" = []))
)]
pub async fn list_laboratories(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<Laboratory>>, ApiError> {
    let labs = app_state
        .masterdata_service
        .list_laboratories()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(labs))
}

// POST /api/masterdata/laboratories
#[utoipa::path(
    post,
    path = "/api/masterdata/laboratories",
    tag = "MasterData",
    request_body = LaboratoryPayload,
    responses(
        (status = 201, body = Laboratory),
        (status = 409, description = "Nome duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_laboratory(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LaboratoryPayload>,
) -> Result<(StatusCode, Json<Laboratory>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lab = app_state
        .masterdata_service
        .create_laboratory(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::CREATED, Json(lab)))
}

// PUT /api/masterdata/laboratories/{id}
#[utoipa::path(
    put,
    path = "/api/masterdata/laboratories/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    request_body = LaboratoryPayload,
    responses((status = 200, body = Laboratory), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_laboratory(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<LaboratoryPayload>,
) -> Result<Json<Laboratory>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lab = app_state
        .masterdata_service
        .update_laboratory(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(lab))
}

// DELETE /api/masterdata/laboratories/{id}
#[utoipa::path(
    delete,
    path = "/api/masterdata/laboratories/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    responses((status = 204), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_laboratory(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .masterdata_service
        .delete_laboratory(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  FORNECEDORES
// =============================================================================

// GET /api/masterdata/suppliers
#[utoipa::path(
    get,
    path = "/api/masterdata/suppliers",
    tag = "MasterData",
    responses((status = 200, body = [Supplier])),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = app_state
        .masterdata_service
        .list_suppliers()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(suppliers))
}

// POST /api/masterdata/suppliers
#[utoipa::path(
    post,
    path = "/api/masterdata/suppliers",
    tag = "MasterData",
    request_body = SupplierPayload,
    responses((status = 201, body = Supplier), (status = 409)),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SupplierPayload>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .masterdata_service
        .create_supplier(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

// PUT /api/masterdata/suppliers/{id}
#[utoipa::path(
    put,
    path = "/api/masterdata/suppliers/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    request_body = SupplierPayload,
    responses((status = 200, body = Supplier), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<SupplierPayload>,
) -> Result<Json<Supplier>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .masterdata_service
        .update_supplier(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(supplier))
}

// DELETE /api/masterdata/suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/masterdata/suppliers/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    responses((status = 204), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .masterdata_service
        .delete_supplier(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PRODUTOS
// =============================================================================

// GET /api/masterdata/products?supplierId=...
#[utoipa::path(
    get,
    path = "/api/masterdata/products",
    tag = "MasterData",
    params(ProductListParams),
    responses((status = 200, body = [ProductWithSupplier])),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<ProductWithSupplier>>, ApiError> {
    let products = app_state
        .masterdata_service
        .list_products(params.supplier_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(products))
}

// POST /api/masterdata/products
#[utoipa::path(
    post,
    path = "/api/masterdata/products",
    tag = "MasterData",
    request_body = ProductPayload,
    responses((status = 201, body = Product), (status = 409, description = "Código duplicado")),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .masterdata_service
        .create_product(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/masterdata/products/{id}
#[utoipa::path(
    put,
    path = "/api/masterdata/products/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    request_body = ProductPayload,
    responses((status = 200, body = Product), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .masterdata_service
        .update_product(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(product))
}

// DELETE /api/masterdata/products/{id}
#[utoipa::path(
    delete,
    path = "/api/masterdata/products/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    responses((status = 204), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .masterdata_service
        .delete_product(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CÓDIGOS ORÇAMENTÁRIOS
// =============================================================================

// GET /api/masterdata/budget-codes
#[utoipa::path(
    get,
    path = "/api/masterdata/budget-codes",
    tag = "MasterData",
    responses((status = 200, body = [BudgetCode])),
    security(("api_jwt" = []))
)]
pub async fn list_budget_codes(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<BudgetCode>>, ApiError> {
    let codes = app_state
        .masterdata_service
        .list_budget_codes()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(codes))
}

// POST /api/masterdata/budget-codes
#[utoipa::path(
    post,
    path = "/api/masterdata/budget-codes",
    tag = "MasterData",
    request_body = BudgetCodePayload,
    responses((status = 201, body = BudgetCode), (status = 409)),
    security(("api_jwt" = []))
)]
pub async fn create_budget_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<BudgetCodePayload>,
) -> Result<(StatusCode, Json<BudgetCode>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let code = app_state
        .masterdata_service
        .create_budget_code(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::CREATED, Json(code)))
}

// PUT /api/masterdata/budget-codes/{id}
#[utoipa::path(
    put,
    path = "/api/masterdata/budget-codes/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    request_body = BudgetCodePayload,
    responses((status = 200, body = BudgetCode), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_budget_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetCodePayload>,
) -> Result<Json<BudgetCode>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let code = app_state
        .masterdata_service
        .update_budget_code(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(code))
}

// DELETE /api/masterdata/budget-codes/{id}
#[utoipa::path(
    delete,
    path = "/api/masterdata/budget-codes/{id}",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    responses((status = 204), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_budget_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .masterdata_service
        .delete_budget_code(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ASSOCIAÇÕES N:N
// =============================================================================

// GET /api/masterdata/budget-codes/{id}/products
#[utoipa::path(
    get,
    path = "/api/masterdata/budget-codes/{id}/products",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = [Product]), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn list_budget_code_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = app_state
        .masterdata_service
        .list_budget_code_products(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(products))
}

// PUT /api/masterdata/budget-codes/{id}/products
#[utoipa::path(
    put,
    path = "/api/masterdata/budget-codes/{id}/products",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    request_body = ReplaceProductsPayload,
    responses((status = 204, description = "Conjunto substituído por inteiro"), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn replace_budget_code_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceProductsPayload>,
) -> Result<StatusCode, ApiError> {
    app_state
        .masterdata_service
        .replace_budget_code_products(id, &payload.product_ids)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/masterdata/laboratories/{id}/budget-codes
#[utoipa::path(
    get,
    path = "/api/masterdata/laboratories/{id}/budget-codes",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = [BudgetCode])),
    security(("api_jwt" = []))
)]
pub async fn list_laboratory_budget_codes(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BudgetCode>>, ApiError> {
    let codes = app_state
        .masterdata_service
        .list_laboratory_budget_codes(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(codes))
}

// PUT /api/masterdata/laboratories/{id}/budget-codes
#[utoipa::path(
    put,
    path = "/api/masterdata/laboratories/{id}/budget-codes",
    tag = "MasterData",
    params(("id" = Uuid, Path)),
    request_body = ReplaceBudgetCodesPayload,
    responses((status = 204, description = "Conjunto substituído por inteiro")),
    security(("api_jwt" = []))
)]
pub async fn replace_laboratory_budget_codes(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceBudgetCodesPayload>,
) -> Result<StatusCode, ApiError> {
    app_state
        .masterdata_service
        .replace_laboratory_budget_codes(id, &payload.budget_code_ids)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}
