// src/models/purchases.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Vocabulário de status das solicitações de compra (em inglês, herdado do
// sistema anterior; o fluxo de viagens usa o vocabulário em espanhol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "purchase_request_status", rename_all = "snake_case")] // Banco
#[serde(rename_all = "snake_case")] // JSON
pub enum PurchaseRequestStatus {
    Pending,
    InProcess,
    Purchased,
    ReadyForDelivery,
    Delivered,
    Rejected,
}

impl PurchaseRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseRequestStatus::Pending => "pending",
            PurchaseRequestStatus::InProcess => "in_process",
            PurchaseRequestStatus::Purchased => "purchased",
            PurchaseRequestStatus::ReadyForDelivery => "ready_for_delivery",
            PurchaseRequestStatus::Delivered => "delivered",
            PurchaseRequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Ars,
    Usd,
    Eur,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub request_number: i64,
    pub laboratory_id: Uuid,
    pub budget_code_id: Uuid,
    pub requester_id: Uuid,
    pub status: PurchaseRequestStatus,
    pub observations: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestItem {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub currency: CurrencyCode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestAttachment {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub file_name: String,
    pub storage_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestComment {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// Linha da listagem: solicitação + laboratório + código + item + produto +
// fornecedor, tudo resolvido no banco.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestSummary {
    pub id: Uuid,
    pub request_number: i64,
    pub status: PurchaseRequestStatus,
    pub laboratory_id: Uuid,
    pub laboratory_name: String,
    pub budget_code: String,
    pub requester_name: String,
    pub product_name: Option<String>,
    pub supplier_name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub currency: Option<CurrencyCode>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Item com o produto resolvido (tela de detalhe)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemWithProduct {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub supplier_name: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub currency: CurrencyCode,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestDetail {
    pub request: PurchaseRequestSummary,
    pub items: Vec<PurchaseItemWithProduct>,
    pub attachments: Vec<PurchaseRequestAttachment>,
    pub comments: Vec<PurchaseRequestComment>,
}

// ---
// Payloads
// ---

// `validator` não conhece Decimal; as checagens numéricas são custom.
fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        return Ok(());
    }
    let mut err = ValidationError::new("positive");
    err.message = Some("El valor debe ser mayor que cero.".into());
    Err(err)
}

// Criação e edição usam o mesmo formato: uma solicitação carrega um item.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestPayload {
    pub laboratory_id: Uuid,
    pub budget_code_id: Uuid,
    pub product_id: Uuid,
    #[validate(custom(function = positive_decimal))]
    pub quantity: Decimal,
    #[validate(custom(function = positive_decimal))]
    pub unit_price: Decimal,
    pub currency: CurrencyCode,
    #[validate(length(
        max = 2000,
        message = "Las observaciones no pueden superar los 2000 caracteres."
    ))]
    pub observations: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseStatusPayload {
    pub status: PurchaseRequestStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 2000, message = "El comentario no puede estar vacío."))]
    pub body: String,
}

// Filtros da listagem (query string)
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListParams {
    pub status: Option<PurchaseRequestStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> PurchaseRequestPayload {
        PurchaseRequestPayload {
            laboratory_id: Uuid::new_v4(),
            budget_code_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: Decimal::new(2, 0),
            unit_price: Decimal::new(1050, 2),
            currency: CurrencyCode::Ars,
            observations: None,
        }
    }

    #[test]
    fn quantidade_zero_reprova() {
        let mut p = payload();
        p.quantity = Decimal::ZERO;
        let errors = p.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }

    #[test]
    fn preco_negativo_reprova() {
        let mut p = payload();
        p.unit_price = Decimal::new(-1, 0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn preco_zero_reprova() {
        let mut p = payload();
        p.unit_price = Decimal::ZERO;
        let errors = p.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("unit_price"));
    }

    #[test]
    fn payload_valido_passa() {
        assert!(payload().validate().is_ok());
    }
}
