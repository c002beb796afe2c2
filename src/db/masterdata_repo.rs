// src/db/masterdata_repo.rs
//
// CRUD dos dados mestres e as associações N:N
// (código orçamentário ↔ produto, laboratório ↔ código orçamentário).

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::map_unique_violation,
    models::masterdata::{BudgetCode, Laboratory, Product, ProductWithSupplier, Supplier},
};

#[derive(Clone)]
pub struct MasterDataRepository {
    pool: PgPool,
}

impl MasterDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LABORATÓRIOS
    // =========================================================================

    pub async fn list_laboratories(&self) -> Result<Vec<Laboratory>, AppError> {
        let labs = sqlx::query_as::<_, Laboratory>("SELECT * FROM laboratories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(labs)
    }

    pub async fn create_laboratory(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Laboratory, AppError> {
        let lab = sqlx::query_as::<_, Laboratory>(
            "INSERT INTO laboratories (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(lab)
    }

    pub async fn update_laboratory(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Laboratory, AppError> {
        let lab = sqlx::query_as::<_, Laboratory>(
            r#"
            UPDATE laboratories
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(AppError::NotFound)?;
        Ok(lab)
    }

    pub async fn delete_laboratory(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM laboratories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  FORNECEDORES
    // =========================================================================

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    pub async fn create_supplier(
        &self,
        name: &str,
        tax_id: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, tax_id, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(tax_id)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(supplier)
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        name: &str,
        tax_id: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $2, tax_id = $3, email = $4, phone = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(tax_id)
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(AppError::NotFound)?;
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    // Com filtro opcional por fornecedor (o antigo RPC get_supplier_products).
    pub async fn list_products(
        &self,
        supplier_id: Option<Uuid>,
    ) -> Result<Vec<ProductWithSupplier>, AppError> {
        let products = sqlx::query_as::<_, ProductWithSupplier>(
            r#"
            SELECT
                p.id, p.supplier_id, s.name AS supplier_name,
                p.code, p.name, p.description, p.reference_price,
                p.created_at, p.updated_at
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE $1::uuid IS NULL OR p.supplier_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn create_product(
        &self,
        supplier_id: Option<Uuid>,
        code: &str,
        name: &str,
        description: Option<&str>,
        reference_price: Option<Decimal>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (supplier_id, code, name, description, reference_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(supplier_id)
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(reference_price)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        supplier_id: Option<Uuid>,
        code: &str,
        name: &str,
        description: Option<&str>,
        reference_price: Option<Decimal>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET supplier_id = $2, code = $3, name = $4, description = $5,
                reference_price = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(supplier_id)
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(reference_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(AppError::NotFound)?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  CÓDIGOS ORÇAMENTÁRIOS
    // =========================================================================

    pub async fn list_budget_codes(&self) -> Result<Vec<BudgetCode>, AppError> {
        let codes = sqlx::query_as::<_, BudgetCode>("SELECT * FROM budget_codes ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(codes)
    }

    pub async fn find_budget_code(&self, id: Uuid) -> Result<Option<BudgetCode>, AppError> {
        let code = sqlx::query_as::<_, BudgetCode>("SELECT * FROM budget_codes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(code)
    }

    pub async fn create_budget_code(
        &self,
        code: &str,
        description: Option<&str>,
    ) -> Result<BudgetCode, AppError> {
        let budget_code = sqlx::query_as::<_, BudgetCode>(
            "INSERT INTO budget_codes (code, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(code)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(budget_code)
    }

    pub async fn update_budget_code(
        &self,
        id: Uuid,
        code: &str,
        description: Option<&str>,
    ) -> Result<BudgetCode, AppError> {
        let budget_code = sqlx::query_as::<_, BudgetCode>(
            r#"
            UPDATE budget_codes
            SET code = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(AppError::NotFound)?;
        Ok(budget_code)
    }

    pub async fn delete_budget_code(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM budget_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  ASSOCIAÇÕES N:N
    // =========================================================================

    // O antigo RPC get_budget_code_product_list
    pub async fn list_budget_code_products(
        &self,
        budget_code_id: Uuid,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.*
            FROM products p
            JOIN budget_code_products bcp ON bcp.product_id = p.id
            WHERE bcp.budget_code_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(budget_code_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // O antigo RPC update_budget_code_products: substitui o conjunto inteiro
    // (sem diff), dentro da transação recebida.
    pub async fn replace_budget_code_products(
        &self,
        conn: &mut sqlx::PgConnection,
        budget_code_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM budget_code_products WHERE budget_code_id = $1")
            .bind(budget_code_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO budget_code_products (budget_code_id, product_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(budget_code_id)
        .bind(product_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn list_laboratory_budget_codes(
        &self,
        laboratory_id: Uuid,
    ) -> Result<Vec<BudgetCode>, AppError> {
        let codes = sqlx::query_as::<_, BudgetCode>(
            r#"
            SELECT bc.*
            FROM budget_codes bc
            JOIN laboratory_budget_codes lbc ON lbc.budget_code_id = bc.id
            WHERE lbc.laboratory_id = $1
            ORDER BY bc.code
            "#,
        )
        .bind(laboratory_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }

    pub async fn replace_laboratory_budget_codes(
        &self,
        conn: &mut sqlx::PgConnection,
        laboratory_id: Uuid,
        budget_code_ids: &[Uuid],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM laboratory_budget_codes WHERE laboratory_id = $1")
            .bind(laboratory_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO laboratory_budget_codes (laboratory_id, budget_code_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(laboratory_id)
        .bind(budget_code_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
