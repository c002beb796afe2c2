// src/services/travel_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        storage::{StorageService, BUCKET_TRAVEL_ATTACHMENTS, BUCKET_TRAVEL_RECEIPTS},
    },
    db::{NotificationRepository, TravelRepository, TravelRequestFields},
    models::travel::{
        CreateExpensePayload, TravelAttachmentKind, TravelRequest, TravelRequestAttachment,
        TravelRequestDetail, TravelRequestExpense, TravelRequestPayload, TravelRequestStatus,
    },
    services::purchase_service::UploadedFile,
};

#[derive(Clone)]
pub struct TravelService {
    repo: TravelRepository,
    notification_repo: NotificationRepository,
    storage: StorageService,
}

impl TravelService {
    pub fn new(
        repo: TravelRepository,
        notification_repo: NotificationRepository,
        storage: StorageService,
    ) -> Self {
        Self {
            repo,
            notification_repo,
            storage,
        }
    }

    pub async fn create_request(
        &self,
        requester_id: Uuid,
        payload: &TravelRequestPayload,
    ) -> Result<TravelRequest, AppError> {
        payload.validate_consistency()?;

        let request = self
            .repo
            .insert_request(requester_id, fields_from(payload))
            .await?;

        tracing::info!("✈️ Solicitação de viagem para '{}' criada", request.destination);
        Ok(request)
    }

    pub async fn list_requests(
        &self,
        status: Option<TravelRequestStatus>,
        search: Option<&str>,
    ) -> Result<Vec<TravelRequest>, AppError> {
        self.repo.list_requests(status, search).await
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<TravelRequestDetail, AppError> {
        let request = self.repo.find_request(id).await?.ok_or(AppError::NotFound)?;
        let expenses = self.repo.list_expenses(id).await?;
        let attachments = self.repo.list_attachments(id).await?;
        Ok(TravelRequestDetail {
            request,
            expenses,
            attachments,
        })
    }

    pub async fn update_request(
        &self,
        id: Uuid,
        payload: &TravelRequestPayload,
    ) -> Result<TravelRequest, AppError> {
        payload.validate_consistency()?;
        self.repo.update_request(id, fields_from(payload)).await
    }

    pub async fn delete_request(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.soft_delete(id).await
    }

    // Aprovação em dois níveis: pendiente -> aprobado_por_gerente ->
    // aprobado_por_finanzas. A guarda otimista do repositório garante que
    // duas aprovações concorrentes não pulem um estágio.
    pub async fn approve(
        &self,
        id: Uuid,
        actor_id: Uuid,
        notes: Option<&str>,
    ) -> Result<TravelRequest, AppError> {
        let current = self.repo.find_request(id).await?.ok_or(AppError::NotFound)?;

        let next = current.status.next_approval_stage().ok_or_else(|| {
            AppError::InvalidStatusTransition(current.status.as_str().to_string())
        })?;

        let updated = self
            .repo
            .transition_status(id, current.status, next, notes, actor_id)
            .await?
            .ok_or_else(|| {
                // O status mudou entre a leitura e a escrita
                AppError::InvalidStatusTransition(current.status.as_str().to_string())
            })?;

        self.notify_requester(&updated).await?;
        Ok(updated)
    }

    // Rejeição exige justificativa não vazia.
    pub async fn reject(
        &self,
        id: Uuid,
        actor_id: Uuid,
        notes: Option<&str>,
    ) -> Result<TravelRequest, AppError> {
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        let Some(notes) = notes else {
            return Err(AppError::NotesRequired);
        };

        let current = self.repo.find_request(id).await?.ok_or(AppError::NotFound)?;
        if !current.status.can_reject() {
            return Err(AppError::InvalidStatusTransition(
                current.status.as_str().to_string(),
            ));
        }

        let updated = self
            .repo
            .transition_status(
                id,
                current.status,
                TravelRequestStatus::Rechazado,
                Some(notes),
                actor_id,
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidStatusTransition(current.status.as_str().to_string())
            })?;

        self.notify_requester(&updated).await?;
        Ok(updated)
    }

    // Viagem aprovada por finanças pode ser encerrada.
    pub async fn complete(&self, id: Uuid, actor_id: Uuid) -> Result<TravelRequest, AppError> {
        let current = self.repo.find_request(id).await?.ok_or(AppError::NotFound)?;
        if current.status != TravelRequestStatus::AprobadoPorFinanzas {
            return Err(AppError::InvalidStatusTransition(
                current.status.as_str().to_string(),
            ));
        }

        let updated = self
            .repo
            .transition_status(
                id,
                current.status,
                TravelRequestStatus::Completado,
                current.approval_notes.as_deref(),
                actor_id,
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidStatusTransition(current.status.as_str().to_string())
            })?;

        self.notify_requester(&updated).await?;
        Ok(updated)
    }

    // ---
    // Despesas
    // ---

    pub async fn add_expense(
        &self,
        request_id: Uuid,
        payload: &CreateExpensePayload,
    ) -> Result<TravelRequestExpense, AppError> {
        self.repo
            .find_request(request_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.repo
            .insert_expense(
                request_id,
                &payload.description,
                payload.amount,
                payload.currency,
                payload.expense_date,
            )
            .await
    }

    pub async fn list_expenses(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<TravelRequestExpense>, AppError> {
        self.repo.list_expenses(request_id).await
    }

    // ---
    // Anexos: recibos e documentos vão para buckets distintos
    // ---

    pub async fn upload_attachments(
        &self,
        request_id: Uuid,
        uploaded_by: Uuid,
        kind: TravelAttachmentKind,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<TravelRequestAttachment>, AppError> {
        self.repo
            .find_request(request_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let bucket = bucket_for(kind);
        let mut saved = Vec::with_capacity(files.len());

        for file in files {
            let storage_path = match self
                .storage
                .save(bucket, request_id, &file.file_name, &file.bytes)
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
                    kind,
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
    ) -> Result<(TravelRequestAttachment, Vec<u8>), AppError> {
        let attachment = self
            .repo
            .find_attachment(attachment_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let bytes = self.storage.read(&attachment.storage_path).await?;
        Ok((attachment, bytes))
    }

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

    async fn notify_requester(&self, request: &TravelRequest) -> Result<(), AppError> {
        let title = format!("Viaje a {}", request.destination);
        let body = format!(
            "Tu solicitud de viaje pasó al estado \"{}\".",
            request.status.as_str()
        );
        self.notification_repo
            .insert(request.requester_id, &title, &body)
            .await?;
        Ok(())
    }
}

fn fields_from(payload: &TravelRequestPayload) -> TravelRequestFields<'_> {
    TravelRequestFields {
        full_name: &payload.full_name,
        document_number: &payload.document_number,
        destination: &payload.destination,
        start_date: payload.start_date,
        end_date: payload.end_date,
        purpose: &payload.purpose,
        budget_amount: payload.budget_amount,
        currency: payload.currency,
        daily_allowance: payload.daily_allowance,
        accommodation: payload.accommodation.as_deref(),
    }
}

fn bucket_for(kind: TravelAttachmentKind) -> &'static str {
    match kind {
        TravelAttachmentKind::Receipt => BUCKET_TRAVEL_RECEIPTS,
        TravelAttachmentKind::Document => BUCKET_TRAVEL_ATTACHMENTS,
    }
}
