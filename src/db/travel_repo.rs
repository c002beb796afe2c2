// src/db/travel_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::purchases::CurrencyCode,
    models::travel::{
        TravelAttachmentKind, TravelRequest, TravelRequestAttachment, TravelRequestExpense,
        TravelRequestStatus,
    },
};

// Campos editáveis de uma solicitação de viagem (criação e edição usam o
// mesmo conjunto; o status nunca passa por aqui).
pub struct TravelRequestFields<'a> {
    pub full_name: &'a str,
    pub document_number: &'a str,
    pub destination: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose: &'a str,
    pub budget_amount: Decimal,
    pub currency: CurrencyCode,
    pub daily_allowance: Option<Decimal>,
    pub accommodation: Option<&'a str>,
}

#[derive(Clone)]
pub struct TravelRepository {
    pool: PgPool,
}

impl TravelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_request(
        &self,
        requester_id: Uuid,
        fields: TravelRequestFields<'_>,
    ) -> Result<TravelRequest, AppError> {
        let request = sqlx::query_as::<_, TravelRequest>(
            r#"
            INSERT INTO travel_requests
                (requester_id, full_name, document_number, destination, start_date, end_date,
                 purpose, budget_amount, currency, daily_allowance, accommodation)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(fields.full_name)
        .bind(fields.document_number)
        .bind(fields.destination)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.purpose)
        .bind(fields.budget_amount)
        .bind(fields.currency)
        .bind(fields.daily_allowance)
        .bind(fields.accommodation)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn find_request(&self, id: Uuid) -> Result<Option<TravelRequest>, AppError> {
        let request = sqlx::query_as::<_, TravelRequest>(
            "SELECT * FROM travel_requests WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn list_requests(
        &self,
        status: Option<TravelRequestStatus>,
        search: Option<&str>,
    ) -> Result<Vec<TravelRequest>, AppError> {
        let requests = sqlx::query_as::<_, TravelRequest>(
            r#"
            SELECT * FROM travel_requests
            WHERE deleted_at IS NULL
              AND ($1::travel_request_status IS NULL OR status = $1)
              AND (
                    $2::text IS NULL
                    OR full_name ILIKE '%' || $2 || '%'
                    OR destination ILIKE '%' || $2 || '%'
                    OR status::text ILIKE '%' || $2 || '%'
              )
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn update_request(
        &self,
        id: Uuid,
        fields: TravelRequestFields<'_>,
    ) -> Result<TravelRequest, AppError> {
        let request = sqlx::query_as::<_, TravelRequest>(
            r#"
            UPDATE travel_requests
            SET full_name = $2, document_number = $3, destination = $4, start_date = $5,
                end_date = $6, purpose = $7, budget_amount = $8, currency = $9,
                daily_allowance = $10, accommodation = $11, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.full_name)
        .bind(fields.document_number)
        .bind(fields.destination)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.purpose)
        .bind(fields.budget_amount)
        .bind(fields.currency)
        .bind(fields.daily_allowance)
        .bind(fields.accommodation)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(request)
    }

    // Transição de status com guarda otimista: só aplica se o status atual
    // ainda for o esperado (aprovações concorrentes não se atropelam).
    pub async fn transition_status(
        &self,
        id: Uuid,
        expected: TravelRequestStatus,
        next: TravelRequestStatus,
        notes: Option<&str>,
        actor_id: Uuid,
    ) -> Result<Option<TravelRequest>, AppError> {
        let request = sqlx::query_as::<_, TravelRequest>(
            r#"
            UPDATE travel_requests
            SET status = $3, approval_notes = $4, approved_by = $5, updated_at = NOW()
            WHERE id = $1 AND status = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(notes)
        .bind(actor_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE travel_requests SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // ---
    // Despesas
    // ---

    pub async fn insert_expense(
        &self,
        travel_request_id: Uuid,
        description: &str,
        amount: Decimal,
        currency: CurrencyCode,
        expense_date: NaiveDate,
    ) -> Result<TravelRequestExpense, AppError> {
        let expense = sqlx::query_as::<_, TravelRequestExpense>(
            r#"
            INSERT INTO travel_request_expenses
                (travel_request_id, description, amount, currency, expense_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(travel_request_id)
        .bind(description)
        .bind(amount)
        .bind(currency)
        .bind(expense_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn list_expenses(
        &self,
        travel_request_id: Uuid,
    ) -> Result<Vec<TravelRequestExpense>, AppError> {
        let expenses = sqlx::query_as::<_, TravelRequestExpense>(
            r#"
            SELECT * FROM travel_request_expenses
            WHERE travel_request_id = $1
            ORDER BY expense_date, created_at
            "#,
        )
        .bind(travel_request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    // ---
    // Anexos (recibos e documentos)
    // ---

    pub async fn insert_attachment(
        &self,
        travel_request_id: Uuid,
        kind: TravelAttachmentKind,
        file_name: &str,
        storage_path: &str,
        content_type: Option<&str>,
        size_bytes: i64,
        uploaded_by: Uuid,
    ) -> Result<TravelRequestAttachment, AppError> {
        let attachment = sqlx::query_as::<_, TravelRequestAttachment>(
            r#"
            INSERT INTO travel_request_attachments
                (travel_request_id, kind, file_name, storage_path, content_type, size_bytes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(travel_request_id)
        .bind(kind)
        .bind(file_name)
        .bind(storage_path)
        .bind(content_type)
        .bind(size_bytes)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(attachment)
    }

    pub async fn list_attachments(
        &self,
        travel_request_id: Uuid,
    ) -> Result<Vec<TravelRequestAttachment>, AppError> {
        let attachments = sqlx::query_as::<_, TravelRequestAttachment>(
            r#"
            SELECT * FROM travel_request_attachments
            WHERE travel_request_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(travel_request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attachments)
    }

    pub async fn find_attachment(
        &self,
        attachment_id: Uuid,
    ) -> Result<Option<TravelRequestAttachment>, AppError> {
        let attachment = sqlx::query_as::<_, TravelRequestAttachment>(
            "SELECT * FROM travel_request_attachments WHERE id = $1",
        )
        .bind(attachment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attachment)
    }

    pub async fn delete_attachment(&self, attachment_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM travel_request_attachments WHERE id = $1")
            .bind(attachment_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
