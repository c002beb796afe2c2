// src/db/purchase_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::purchases::{
        CurrencyCode, PurchaseItemWithProduct, PurchaseRequest, PurchaseRequestAttachment,
        PurchaseRequestComment, PurchaseRequestItem, PurchaseRequestStatus,
        PurchaseRequestSummary,
    },
};

// Colunas da listagem (solicitação + laboratório + código + primeiro item).
// O sistema expõe um item por solicitação no resumo; o detalhe traz todos.
const SUMMARY_SELECT: &str = r#"
    SELECT
        pr.id,
        pr.request_number,
        pr.status,
        pr.laboratory_id,
        l.name AS laboratory_name,
        bc.code AS budget_code,
        prof.full_name AS requester_name,
        p.name AS product_name,
        s.name AS supplier_name,
        i.quantity,
        i.unit_price,
        i.currency,
        pr.observations,
        pr.created_at
    FROM purchase_requests pr
    JOIN laboratories l ON l.id = pr.laboratory_id
    JOIN budget_codes bc ON bc.id = pr.budget_code_id
    JOIN profiles prof ON prof.user_id = pr.requester_id
    LEFT JOIN LATERAL (
        SELECT * FROM purchase_request_items
        WHERE purchase_request_id = pr.id
        ORDER BY created_at
        LIMIT 1
    ) i ON TRUE
    LEFT JOIN products p ON p.id = i.product_id
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

#[derive(Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SOLICITAÇÕES
    // =========================================================================

    // Insere a solicitação dentro da transação de criação (solicitação +
    // item nascem juntos ou nada persiste).
    pub async fn insert_request<'e, E>(
        &self,
        executor: E,
        laboratory_id: Uuid,
        budget_code_id: Uuid,
        requester_id: Uuid,
        observations: Option<&str>,
    ) -> Result<PurchaseRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, PurchaseRequest>(
            r#"
            INSERT INTO purchase_requests (laboratory_id, budget_code_id, requester_id, observations)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(laboratory_id)
        .bind(budget_code_id)
        .bind(requester_id)
        .bind(observations)
        .fetch_one(executor)
        .await?;
        Ok(request)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        purchase_request_id: Uuid,
        product_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
        currency: CurrencyCode,
    ) -> Result<PurchaseRequestItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, PurchaseRequestItem>(
            r#"
            INSERT INTO purchase_request_items
                (purchase_request_id, product_id, quantity, unit_price, currency)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(purchase_request_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(currency)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    // Soft delete exclui da busca; não filtramos aqui por requester porque a
    // autorização fica na camada de serviço.
    pub async fn find_request(&self, id: Uuid) -> Result<Option<PurchaseRequest>, AppError> {
        let request = sqlx::query_as::<_, PurchaseRequest>(
            "SELECT * FROM purchase_requests WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<Option<PurchaseRequestSummary>, AppError> {
        let sql = format!("{SUMMARY_SELECT} WHERE pr.id = $1 AND pr.deleted_at IS NULL");
        let summary = sqlx::query_as::<_, PurchaseRequestSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(summary)
    }

    // Listagem com filtro por status e busca livre (número, laboratório,
    // status), como a tela de listagem do sistema anterior.
    pub async fn list_summaries(
        &self,
        status: Option<PurchaseRequestStatus>,
        search: Option<&str>,
    ) -> Result<Vec<PurchaseRequestSummary>, AppError> {
        let sql = format!(
            r#"{SUMMARY_SELECT}
            WHERE pr.deleted_at IS NULL
              AND ($1::purchase_request_status IS NULL OR pr.status = $1)
              AND (
                    $2::text IS NULL
                    OR pr.request_number::text ILIKE '%' || $2 || '%'
                    OR l.name ILIKE '%' || $2 || '%'
                    OR pr.status::text ILIKE '%' || $2 || '%'
              )
            ORDER BY pr.created_at DESC
            "#
        );
        let summaries = sqlx::query_as::<_, PurchaseRequestSummary>(&sql)
            .bind(status)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;
        Ok(summaries)
    }

    pub async fn update_request(
        &self,
        id: Uuid,
        laboratory_id: Uuid,
        budget_code_id: Uuid,
        observations: Option<&str>,
    ) -> Result<PurchaseRequest, AppError> {
        let request = sqlx::query_as::<_, PurchaseRequest>(
            r#"
            UPDATE purchase_requests
            SET laboratory_id = $2, budget_code_id = $3, observations = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(laboratory_id)
        .bind(budget_code_id)
        .bind(observations)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(request)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: PurchaseRequestStatus,
    ) -> Result<PurchaseRequest, AppError> {
        let request = sqlx::query_as::<_, PurchaseRequest>(
            r#"
            UPDATE purchase_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(request)
    }

    // Soft delete: marca o instante, nunca remove a linha.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE purchase_requests SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // A invariante: o código orçamentário tem que estar associado ao
    // laboratório da solicitação.
    pub async fn budget_code_belongs_to_laboratory(
        &self,
        laboratory_id: Uuid,
        budget_code_id: Uuid,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM laboratory_budget_codes
                WHERE laboratory_id = $1 AND budget_code_id = $2
            )
            "#,
        )
        .bind(laboratory_id)
        .bind(budget_code_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn list_items(&self, request_id: Uuid) -> Result<Vec<PurchaseItemWithProduct>, AppError> {
        let items = sqlx::query_as::<_, PurchaseItemWithProduct>(
            r#"
            SELECT
                i.id, i.product_id, p.code AS product_code, p.name AS product_name,
                s.name AS supplier_name, i.quantity, i.unit_price, i.currency
            FROM purchase_request_items i
            JOIN products p ON p.id = i.product_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE i.purchase_request_id = $1
            ORDER BY i.created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn first_item(&self, request_id: Uuid) -> Result<Option<PurchaseRequestItem>, AppError> {
        let item = sqlx::query_as::<_, PurchaseRequestItem>(
            r#"
            SELECT * FROM purchase_request_items
            WHERE purchase_request_id = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn update_item(
        &self,
        item_id: Uuid,
        product_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
        currency: CurrencyCode,
    ) -> Result<PurchaseRequestItem, AppError> {
        let item = sqlx::query_as::<_, PurchaseRequestItem>(
            r#"
            UPDATE purchase_request_items
            SET product_id = $2, quantity = $3, unit_price = $4, currency = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(currency)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(item)
    }

    // =========================================================================
    //  ANEXOS
    // =========================================================================

    pub async fn insert_attachment(
        &self,
        purchase_request_id: Uuid,
        file_name: &str,
        storage_path: &str,
        content_type: Option<&str>,
        size_bytes: i64,
        uploaded_by: Uuid,
    ) -> Result<PurchaseRequestAttachment, AppError> {
        let attachment = sqlx::query_as::<_, PurchaseRequestAttachment>(
            r#"
            INSERT INTO purchase_request_attachments
                (purchase_request_id, file_name, storage_path, content_type, size_bytes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(purchase_request_id)
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
        request_id: Uuid,
    ) -> Result<Vec<PurchaseRequestAttachment>, AppError> {
        let attachments = sqlx::query_as::<_, PurchaseRequestAttachment>(
            r#"
            SELECT * FROM purchase_request_attachments
            WHERE purchase_request_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attachments)
    }

    pub async fn find_attachment(
        &self,
        attachment_id: Uuid,
    ) -> Result<Option<PurchaseRequestAttachment>, AppError> {
        let attachment = sqlx::query_as::<_, PurchaseRequestAttachment>(
            "SELECT * FROM purchase_request_attachments WHERE id = $1",
        )
        .bind(attachment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attachment)
    }

    pub async fn delete_attachment(&self, attachment_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM purchase_request_attachments WHERE id = $1")
            .bind(attachment_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  COMENTÁRIOS
    // =========================================================================

    pub async fn insert_comment(
        &self,
        purchase_request_id: Uuid,
        author_id: Uuid,
        body: &str,
    ) -> Result<PurchaseRequestComment, AppError> {
        let comment = sqlx::query_as::<_, PurchaseRequestComment>(
            r#"
            WITH inserted AS (
                INSERT INTO purchase_request_comments (purchase_request_id, author_id, body)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT inserted.id, inserted.purchase_request_id, inserted.author_id,
                   prof.full_name AS author_name, inserted.body, inserted.created_at
            FROM inserted
            JOIN profiles prof ON prof.user_id = inserted.author_id
            "#,
        )
        .bind(purchase_request_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn list_comments(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<PurchaseRequestComment>, AppError> {
        let comments = sqlx::query_as::<_, PurchaseRequestComment>(
            r#"
            SELECT c.id, c.purchase_request_id, c.author_id,
                   prof.full_name AS author_name, c.body, c.created_at
            FROM purchase_request_comments c
            JOIN profiles prof ON prof.user_id = c.author_id
            WHERE c.purchase_request_id = $1
            ORDER BY c.created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }
}
