// src/services/admin_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProfileRepository,
    models::profile::{AdminUserRow, Profile, Role},
};

// Gestão de usuários, restrita a administradores (o guardião fica na rota).
#[derive(Clone)]
pub struct AdminService {
    profile_repo: ProfileRepository,
    pool: PgPool,
}

impl AdminService {
    pub fn new(profile_repo: ProfileRepository, pool: PgPool) -> Self {
        Self { profile_repo, pool }
    }

    // O painel inteiro sai de um único JOIN no banco.
    pub async fn list_users(&self) -> Result<Vec<AdminUserRow>, AppError> {
        self.profile_repo.list_admin_rows().await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        self.profile_repo.list_roles().await
    }

    pub async fn set_blocked(&self, user_id: Uuid, blocked: bool) -> Result<Profile, AppError> {
        let profile = self.profile_repo.set_blocked(user_id, blocked).await?;
        tracing::info!(
            "🔒 Usuário {} {}",
            user_id,
            if blocked { "bloqueado" } else { "desbloqueado" }
        );
        Ok(profile)
    }

    // Promover mantém o papel atual; rebaixar devolve o usuário ao papel
    // padrão, na mesma escrita. Um ex-admin nunca fica com papel de admin
    // sem a flag.
    pub async fn set_admin(&self, user_id: Uuid, is_admin: bool) -> Result<Profile, AppError> {
        let current = self
            .profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let role_id = if is_admin {
            current.role_id
        } else {
            self.profile_repo
                .find_role_by_slug("usuario")
                .await?
                .ok_or_else(|| anyhow::anyhow!("Papel padrão 'usuario' não existe no banco"))?
                .id
        };

        let profile = self
            .profile_repo
            .set_admin(&self.pool, user_id, is_admin, role_id)
            .await?;
        Ok(profile)
    }

    pub async fn set_role(&self, user_id: Uuid, role_id: Uuid) -> Result<Profile, AppError> {
        // Papel inexistente é 404, não violação de FK
        self.profile_repo
            .find_role_by_id(role_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.profile_repo.set_role(user_id, role_id).await
    }

    pub async fn set_laboratory(
        &self,
        user_id: Uuid,
        laboratory_id: Option<Uuid>,
    ) -> Result<Profile, AppError> {
        self.profile_repo.set_laboratory(user_id, laboratory_id).await
    }
}
