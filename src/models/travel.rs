// src/models/travel.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::purchases::CurrencyCode;

// Vocabulário herdado do sistema anterior (em espanhol). Intencionalmente
// distinto do enum de compras; ver DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "travel_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TravelRequestStatus {
    Pendiente,
    AprobadoPorGerente,
    AprobadoPorFinanzas,
    Rechazado,
    Completado,
}

impl TravelRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelRequestStatus::Pendiente => "pendiente",
            TravelRequestStatus::AprobadoPorGerente => "aprobado_por_gerente",
            TravelRequestStatus::AprobadoPorFinanzas => "aprobado_por_finanzas",
            TravelRequestStatus::Rechazado => "rechazado",
            TravelRequestStatus::Completado => "completado",
        }
    }

    // Próximo estágio de aprovação, se houver. A aprovação é em dois níveis:
    // gerência e depois finanças.
    pub fn next_approval_stage(&self) -> Option<TravelRequestStatus> {
        match self {
            TravelRequestStatus::Pendiente => Some(TravelRequestStatus::AprobadoPorGerente),
            TravelRequestStatus::AprobadoPorGerente => Some(TravelRequestStatus::AprobadoPorFinanzas),
            _ => None,
        }
    }

    // Rejeitar só faz sentido enquanto a solicitação ainda está em análise.
    pub fn can_reject(&self) -> bool {
        matches!(
            self,
            TravelRequestStatus::Pendiente | TravelRequestStatus::AprobadoPorGerente
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "travel_attachment_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TravelAttachmentKind {
    Receipt,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub full_name: String,
    pub document_number: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose: String,
    pub budget_amount: Decimal,
    pub currency: CurrencyCode,
    pub status: TravelRequestStatus,
    pub daily_allowance: Option<Decimal>,
    pub accommodation: Option<String>,
    pub approval_notes: Option<String>,
    pub approved_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequestExpense {
    pub id: Uuid,
    pub travel_request_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub expense_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequestAttachment {
    pub id: Uuid,
    pub travel_request_id: Uuid,
    pub kind: TravelAttachmentKind,
    pub file_name: String,
    pub storage_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequestDetail {
    pub request: TravelRequest,
    pub expenses: Vec<TravelRequestExpense>,
    pub attachments: Vec<TravelRequestAttachment>,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequestPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub full_name: String,
    #[validate(length(min = 1, message = "El documento es obligatorio."))]
    pub document_number: String,
    #[validate(length(min = 1, message = "El destino es obligatorio."))]
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, message = "El motivo es obligatorio."))]
    pub purpose: String,
    pub budget_amount: Decimal,
    pub currency: CurrencyCode,
    pub daily_allowance: Option<Decimal>,
    pub accommodation: Option<String>,
}

impl TravelRequestPayload {
    // Regras entre campos, que o derive não cobre.
    pub fn validate_consistency(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.end_date < self.start_date {
            let mut err = ValidationError::new("date_range");
            err.message =
                Some("La fecha de regreso no puede ser anterior a la de salida.".into());
            errors.add("endDate", err);
        }

        if self.budget_amount <= Decimal::ZERO {
            let mut err = ValidationError::new("positive");
            err.message = Some("El presupuesto debe ser mayor que cero.".into());
            errors.add("budgetAmount", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveTravelPayload {
    pub notes: Option<String>,
}

// A rejeição exige justificativa; o serviço recusa notas vazias.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectTravelPayload {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpensePayload {
    #[validate(length(min = 1, message = "La descripción es obligatoria."))]
    pub description: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub expense_date: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TravelListParams {
    pub status: Option<TravelRequestStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aprovacao_em_dois_niveis() {
        assert_eq!(
            TravelRequestStatus::Pendiente.next_approval_stage(),
            Some(TravelRequestStatus::AprobadoPorGerente)
        );
        assert_eq!(
            TravelRequestStatus::AprobadoPorGerente.next_approval_stage(),
            Some(TravelRequestStatus::AprobadoPorFinanzas)
        );
        assert_eq!(TravelRequestStatus::AprobadoPorFinanzas.next_approval_stage(), None);
        assert_eq!(TravelRequestStatus::Rechazado.next_approval_stage(), None);
    }

    #[test]
    fn status_serializa_no_vocabulario_espanhol() {
        let json = serde_json::to_string(&TravelRequestStatus::AprobadoPorGerente).unwrap();
        assert_eq!(json, "\"aprobado_por_gerente\"");
    }

    #[test]
    fn datas_invertidas_reprovam() {
        let payload = TravelRequestPayload {
            full_name: "Ana Souza".into(),
            document_number: "12345678".into(),
            destination: "Córdoba".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            purpose: "Congreso".into(),
            budget_amount: Decimal::new(1000, 0),
            currency: CurrencyCode::Ars,
            daily_allowance: None,
            accommodation: None,
        };
        let errors = payload.validate_consistency().unwrap_err();
        assert!(errors.field_errors().contains_key("endDate"));
    }
}
