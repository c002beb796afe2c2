// src/services/purchase_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        storage::{StorageService, BUCKET_PURCHASE_ATTACHMENTS},
    },
    db::{MasterDataRepository, NotificationRepository, PurchaseRepository},
    models::purchases::{
        PurchaseRequest, PurchaseRequestAttachment, PurchaseRequestComment, PurchaseRequestDetail,
        PurchaseRequestItem, PurchaseRequestPayload, PurchaseRequestStatus, PurchaseRequestSummary,
    },
};

// Um arquivo recebido no multipart, já lido para a memória.
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct PurchaseService {
    repo: PurchaseRepository,
    masterdata_repo: MasterDataRepository,
    notification_repo: NotificationRepository,
    storage: StorageService,
    pool: PgPool,
}

impl PurchaseService {
    pub fn new(
        repo: PurchaseRepository,
        masterdata_repo: MasterDataRepository,
        notification_repo: NotificationRepository,
        storage: StorageService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            masterdata_repo,
            notification_repo,
            storage,
            pool,
        }
    }

    // Criação: solicitação + item nascem na mesma transação. O sistema
    // anterior fazia dois inserts soltos e podia deixar uma solicitação
    // órfã se o segundo falhasse.
    pub async fn create_request(
        &self,
        requester_id: Uuid,
        payload: &PurchaseRequestPayload,
    ) -> Result<(PurchaseRequest, PurchaseRequestItem), AppError> {
        self.check_budget_code(payload.laboratory_id, payload.budget_code_id)
            .await?;

        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .insert_request(
                &mut *tx,
                payload.laboratory_id,
                payload.budget_code_id,
                requester_id,
                payload.observations.as_deref(),
            )
            .await?;

        let item = self
            .repo
            .insert_item(
                &mut *tx,
                request.id,
                payload.product_id,
                payload.quantity,
                payload.unit_price,
                payload.currency,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🛒 Solicitação de compra #{} criada", request.request_number);
        Ok((request, item))
    }

    pub async fn list_requests(
        &self,
        status: Option<PurchaseRequestStatus>,
        search: Option<&str>,
    ) -> Result<Vec<PurchaseRequestSummary>, AppError> {
        self.repo.list_summaries(status, search).await
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<PurchaseRequestDetail, AppError> {
        let request = self.repo.find_summary(id).await?.ok_or(AppError::NotFound)?;
        let items = self.repo.list_items(id).await?;
        let attachments = self.repo.list_attachments(id).await?;
        let comments = self.repo.list_comments(id).await?;
        Ok(PurchaseRequestDetail {
            request,
            items,
            attachments,
            comments,
        })
    }

    // Edição: compara o antes e o depois e notifica o solicitante com a
    // lista de campos alterados. Quem edita a própria solicitação não
    // recebe notificação.
    pub async fn update_request(
        &self,
        id: Uuid,
        editor_id: Uuid,
        payload: &PurchaseRequestPayload,
    ) -> Result<(PurchaseRequest, PurchaseRequestItem), AppError> {
        self.check_budget_code(payload.laboratory_id, payload.budget_code_id)
            .await?;

        let before = self.repo.find_request(id).await?.ok_or(AppError::NotFound)?;
        let before_item = self.repo.first_item(id).await?.ok_or(AppError::NotFound)?;

        let changes = build_change_list(&before, &before_item, payload);

        let request = self
            .repo
            .update_request(
                id,
                payload.laboratory_id,
                payload.budget_code_id,
                payload.observations.as_deref(),
            )
            .await?;

        let item = self
            .repo
            .update_item(
                before_item.id,
                payload.product_id,
                payload.quantity,
                payload.unit_price,
                payload.currency,
            )
            .await?;

        if !changes.is_empty() && editor_id != request.requester_id {
            let title = format!("Solicitud #{} modificada", request.request_number);
            let body = format!("Campos modificados: {}.", changes.join(", "));
            self.notification_repo
                .insert(request.requester_id, &title, &body)
                .await?;
        }

        Ok((request, item))
    }

    // Mudança de status pela equipe de compras, com aviso ao solicitante.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PurchaseRequestStatus,
    ) -> Result<PurchaseRequest, AppError> {
        let request = self.repo.update_status(id, status).await?;

        let title = format!("Solicitud #{}", request.request_number);
        let body = format!("Tu solicitud pasó al estado \"{}\".", status.as_str());
        self.notification_repo
            .insert(request.requester_id, &title, &body)
            .await?;

        tracing::info!(
            "📦 Solicitação #{} agora está em '{}'",
            request.request_number,
            status.as_str()
        );
        Ok(request)
    }

    pub async fn delete_request(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.soft_delete(id).await
    }

    // =========================================================================
    //  ANEXOS
    // =========================================================================

    // Upload sequencial: um arquivo que falha não impede os demais. Se o
    // objeto foi gravado mas o registro falhou, o objeto é removido para
    // não virar lixo órfão no disco.
    pub async fn upload_attachments(
        &self,
        request_id: Uuid,
        uploaded_by: Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<PurchaseRequestAttachment>, AppError> {
        self.repo
            .find_request(request_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut saved = Vec::with_capacity(files.len());

        for file in files {
            let storage_path = match self
                .storage
                .save(
                    BUCKET_PURCHASE_ATTACHMENTS,
                    request_id,
                    &file.file_name,
                    &file.bytes,
                )
                .await
            {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("⚠️ Falha ao gravar anexo '{}': {}", file.file_name, e);
                    continue;
                }
            };

            match self
                .repo
                .insert_attachment(
                    request_id,
                    &file.file_name,
                    &storage_path,
                    file.content_type.as_deref(),
                    file.bytes.len() as i64,
                    uploaded_by,
                )
                .await
            {
                Ok(attachment) => saved.push(attachment),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Falha ao registrar anexo '{}', removendo objeto: {}",
                        file.file_name,
                        e
                    );
                    if let Err(del) = self.storage.delete(&storage_path).await {
                        tracing::error!("Objeto órfão em '{}': {}", storage_path, del);
                    }
                }
            }
        }

        Ok(saved)
    }

    pub async fn download_attachment(
        &self,
        attachment_id: Uuid,
    ) -> Result<(PurchaseRequestAttachment, Vec<u8>), AppError> {
        let attachment = self
            .repo
            .find_attachment(attachment_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let bytes = self.storage.read(&attachment.storage_path).await?;
        Ok((attachment, bytes))
    }

    // Remove primeiro o registro; o objeto depois. Se a remoção do objeto
    // falhar, sobra lixo no disco (tolerável), nunca um registro sem objeto.
    pub async fn delete_attachment(&self, attachment_id: Uuid) -> Result<(), AppError> {
        let attachment = self
            .repo
            .find_attachment(attachment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.repo.delete_attachment(attachment_id).await?;

        if let Err(e) = self.storage.delete(&attachment.storage_path).await {
            tracing::warn!("⚠️ Objeto '{}' não removido: {}", attachment.storage_path, e);
        }
        Ok(())
    }

    // =========================================================================
    //  COMENTÁRIOS
    // =========================================================================

    // Comentário novo notifica o solicitante (a menos que seja ele mesmo).
    pub async fn add_comment(
        &self,
        request_id: Uuid,
        author_id: Uuid,
        body: &str,
    ) -> Result<PurchaseRequestComment, AppError> {
        let request = self
            .repo
            .find_request(request_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let comment = self.repo.insert_comment(request_id, author_id, body).await?;

        if author_id != request.requester_id {
            let title = format!("Solicitud #{}", request.request_number);
            self.notification_repo
                .insert(request.requester_id, &title, "Hay un nuevo comentario en tu solicitud.")
                .await?;
        }

        Ok(comment)
    }

    pub async fn list_comments(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<PurchaseRequestComment>, AppError> {
        self.repo.list_comments(request_id).await
    }

    // ---

    async fn check_budget_code(
        &self,
        laboratory_id: Uuid,
        budget_code_id: Uuid,
    ) -> Result<(), AppError> {
        // Garante mensagens claras: laboratório/código inexistentes são 404,
        // associação ausente é a violação da invariante.
        self.masterdata_repo
            .find_budget_code(budget_code_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !self
            .repo
            .budget_code_belongs_to_laboratory(laboratory_id, budget_code_id)
            .await?
        {
            return Err(AppError::BudgetCodeNotInLaboratory);
        }
        Ok(())
    }
}

// Lista de campos alterados, em espanhol, para o corpo da notificação.
// Função livre para poder ser testada sem banco.
pub fn build_change_list(
    before: &PurchaseRequest,
    before_item: &PurchaseRequestItem,
    payload: &PurchaseRequestPayload,
) -> Vec<&'static str> {
    let mut changes = Vec::new();

    if before.laboratory_id != payload.laboratory_id {
        changes.push("laboratorio");
    }
    if before.budget_code_id != payload.budget_code_id {
        changes.push("código presupuestario");
    }
    if before.observations.as_deref() != payload.observations.as_deref() {
        changes.push("observaciones");
    }
    if before_item.product_id != payload.product_id {
        changes.push("producto");
    }
    if before_item.quantity != payload.quantity {
        changes.push("cantidad");
    }
    if before_item.unit_price != payload.unit_price {
        changes.push("precio unitario");
    }
    if before_item.currency != payload.currency {
        changes.push("moneda");
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use crate::models::purchases::CurrencyCode;

    fn fixture() -> (PurchaseRequest, PurchaseRequestItem, PurchaseRequestPayload) {
        let lab = Uuid::new_v4();
        let code = Uuid::new_v4();
        let product = Uuid::new_v4();
        let now = Utc::now();

        let request = PurchaseRequest {
            id: Uuid::new_v4(),
            request_number: 42,
            laboratory_id: lab,
            budget_code_id: code,
            requester_id: Uuid::new_v4(),
            status: PurchaseRequestStatus::Pending,
            observations: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        let item = PurchaseRequestItem {
            id: Uuid::new_v4(),
            purchase_request_id: request.id,
            product_id: product,
            quantity: Decimal::new(3, 0),
            unit_price: Decimal::new(100, 0),
            currency: CurrencyCode::Ars,
            created_at: now,
            updated_at: now,
        };
        let payload = PurchaseRequestPayload {
            laboratory_id: lab,
            budget_code_id: code,
            product_id: product,
            quantity: Decimal::new(3, 0),
            unit_price: Decimal::new(100, 0),
            currency: CurrencyCode::Ars,
            observations: None,
        };
        (request, item, payload)
    }

    #[test]
    fn edicao_sem_mudancas_nao_gera_lista() {
        let (request, item, payload) = fixture();
        assert!(build_change_list(&request, &item, &payload).is_empty());
    }

    #[test]
    fn cada_campo_alterado_aparece_na_lista() {
        let (request, item, mut payload) = fixture();
        payload.quantity = Decimal::new(5, 0);
        payload.currency = CurrencyCode::Usd;

        let changes = build_change_list(&request, &item, &payload);
        assert_eq!(changes, vec!["cantidad", "moneda"]);
    }

    #[test]
    fn troca_de_produto_e_laboratorio_sao_detectadas() {
        let (request, item, mut payload) = fixture();
        payload.product_id = Uuid::new_v4();
        payload.laboratory_id = Uuid::new_v4();

        let changes = build_change_list(&request, &item, &payload);
        assert!(changes.contains(&"producto"));
        assert!(changes.contains(&"laboratorio"));
    }
}
