use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::common::error::AppError;

// Os "buckets" que o sistema conhece. Em disco, cada um é um diretório
// abaixo da raiz de armazenamento.
pub const BUCKET_PURCHASE_ATTACHMENTS: &str = "purchase-attachments";
pub const BUCKET_TRAVEL_RECEIPTS: &str = "travel-receipts";
pub const BUCKET_TRAVEL_ATTACHMENTS: &str = "travel-attachments";

// Armazenamento de objetos em disco local. Os caminhos persistidos no banco
// são sempre relativos ("bucket/{entity_id}/{nome_sanitizado}"), nunca
// absolutos, para a raiz poder mudar entre ambientes.
#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // Grava o objeto e retorna o caminho relativo persistível.
    pub async fn save(
        &self,
        bucket: &str,
        entity_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let safe_name = sanitize_file_name(file_name);
        let relative = format!("{}/{}/{}", bucket, entity_id, safe_name);

        let dir = self.root.join(bucket).join(entity_id.to_string());
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&safe_name), bytes).await?;

        Ok(relative)
    }

    pub async fn read(&self, storage_path: &str) -> Result<Vec<u8>, AppError> {
        let abs = self.resolve(storage_path)?;
        let bytes = fs::read(abs).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound
            } else {
                AppError::StorageError(e)
            }
        })?;
        Ok(bytes)
    }

    // Remove o objeto. Objeto inexistente não é erro: a compensação pode
    // rodar duas vezes.
    pub async fn delete(&self, storage_path: &str) -> Result<(), AppError> {
        let abs = self.resolve(storage_path)?;
        match fs::remove_file(abs).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StorageError(e)),
        }
    }

    // Caminhos vêm do banco, mas ainda assim recusamos qualquer componente
    // de navegação antes de tocar o disco.
    fn resolve(&self, storage_path: &str) -> Result<PathBuf, AppError> {
        if storage_path.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
            return Err(AppError::NotFound);
        }
        Ok(self.root.join(storage_path))
    }
}

// Mantém apenas caracteres seguros para nome de arquivo; o resto vira '_'.
// Nome vazio (ou só pontos) vira "archivo".
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.').to_string();
    if trimmed.is_empty() {
        "archivo".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitiza_nomes_com_espacos_e_acentos() {
        assert_eq!(sanitize_file_name("presupuesto final.pdf"), "presupuesto_final.pdf");
        assert_eq!(sanitize_file_name("cotización#1.xlsx"), "cotizaci_n_1.xlsx");
    }

    #[test]
    fn nome_vazio_ou_so_pontos_vira_padrao() {
        assert_eq!(sanitize_file_name(""), "archivo");
        assert_eq!(sanitize_file_name("..."), "archivo");
    }

    #[test]
    fn caminho_com_navegacao_nao_resolve() {
        let storage = StorageService::new("/tmp/qualquer");
        assert!(storage.resolve("purchase-attachments/../../etc/passwd").is_err());
        assert!(storage.resolve("bucket//arquivo").is_err());
    }

    #[tokio::test]
    async fn grava_le_e_remove_objeto() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = StorageService::new(dir.path());
        let id = Uuid::new_v4();

        let path = storage
            .save(BUCKET_PURCHASE_ATTACHMENTS, id, "nota fiscal.pdf", b"conteudo")
            .await
            .expect("save");
        assert_eq!(path, format!("purchase-attachments/{}/nota_fiscal.pdf", id));

        let bytes = storage.read(&path).await.expect("read");
        assert_eq!(bytes, b"conteudo");

        storage.delete(&path).await.expect("delete");
        assert!(matches!(storage.read(&path).await, Err(AppError::NotFound)));

        // Apagar de novo não é erro (compensação idempotente)
        storage.delete(&path).await.expect("delete idempotente");
    }
}
