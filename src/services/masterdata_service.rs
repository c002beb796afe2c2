// src/services/masterdata_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MasterDataRepository,
    models::masterdata::{
        BudgetCode, BudgetCodePayload, Laboratory, LaboratoryPayload, Product, ProductPayload,
        ProductWithSupplier, Supplier, SupplierPayload,
    },
};

#[derive(Clone)]
pub struct MasterDataService {
    repo: MasterDataRepository,
    pool: PgPool,
}

impl MasterDataService {
    pub fn new(repo: MasterDataRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // --- Laboratórios ---

    pub async fn list_laboratories(&self) -> Result<Vec<Laboratory>, AppError> {
        self.repo.list_laboratories().await
    }

    pub async fn create_laboratory(
        &self,
        payload: &LaboratoryPayload,
    ) -> Result<Laboratory, AppError> {
        self.repo
            .create_laboratory(&payload.name, payload.description.as_deref())
            .await
    }

    pub async fn update_laboratory(
        &self,
        id: Uuid,
        payload: &LaboratoryPayload,
    ) -> Result<Laboratory, AppError> {
        self.repo
            .update_laboratory(id, &payload.name, payload.description.as_deref())
            .await
    }

    pub async fn delete_laboratory(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_laboratory(id).await
    }

    // --- Fornecedores ---

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        self.repo.list_suppliers().await
    }

    pub async fn create_supplier(&self, payload: &SupplierPayload) -> Result<Supplier, AppError> {
        self.repo
            .create_supplier(
                &payload.name,
                payload.tax_id.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )
            .await
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        payload: &SupplierPayload,
    ) -> Result<Supplier, AppError> {
        self.repo
            .update_supplier(
                id,
                &payload.name,
                payload.tax_id.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )
            .await
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_supplier(id).await
    }

    // --- Produtos ---

    pub async fn list_products(
        &self,
        supplier_id: Option<Uuid>,
    ) -> Result<Vec<ProductWithSupplier>, AppError> {
        self.repo.list_products(supplier_id).await
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, AppError> {
        self.repo
            .create_product(
                payload.supplier_id,
                &payload.code,
                &payload.name,
                payload.description.as_deref(),
                payload.reference_price,
            )
            .await
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        payload: &ProductPayload,
    ) -> Result<Product, AppError> {
        self.repo
            .update_product(
                id,
                payload.supplier_id,
                &payload.code,
                &payload.name,
                payload.description.as_deref(),
                payload.reference_price,
            )
            .await
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_product(id).await
    }

    // --- Códigos orçamentários ---

    pub async fn list_budget_codes(&self) -> Result<Vec<BudgetCode>, AppError> {
        self.repo.list_budget_codes().await
    }

    pub async fn create_budget_code(
        &self,
        payload: &BudgetCodePayload,
    ) -> Result<BudgetCode, AppError> {
        self.repo
            .create_budget_code(&payload.code, payload.description.as_deref())
            .await
    }

    pub async fn update_budget_code(
        &self,
        id: Uuid,
        payload: &BudgetCodePayload,
    ) -> Result<BudgetCode, AppError> {
        self.repo
            .update_budget_code(id, &payload.code, payload.description.as_deref())
            .await
    }

    pub async fn delete_budget_code(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_budget_code(id).await
    }

    // --- Associações N:N (substituição do conjunto inteiro) ---

    pub async fn list_budget_code_products(
        &self,
        budget_code_id: Uuid,
    ) -> Result<Vec<Product>, AppError> {
        self.repo
            .find_budget_code(budget_code_id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.repo.list_budget_code_products(budget_code_id).await
    }

    pub async fn replace_budget_code_products(
        &self,
        budget_code_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<(), AppError> {
        self.repo
            .find_budget_code(budget_code_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut tx = self.pool.begin().await?;
        self.repo
            .replace_budget_code_products(&mut *tx, budget_code_id, product_ids)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_laboratory_budget_codes(
        &self,
        laboratory_id: Uuid,
    ) -> Result<Vec<BudgetCode>, AppError> {
        self.repo.list_laboratory_budget_codes(laboratory_id).await
    }

    pub async fn replace_laboratory_budget_codes(
        &self,
        laboratory_id: Uuid,
        budget_code_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.repo
            .replace_laboratory_budget_codes(&mut *tx, laboratory_id, budget_code_ids)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
