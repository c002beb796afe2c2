// src/db/profile_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::profile::{AdminUserRow, Profile, Role},
};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    // Cria o perfil junto com o usuário (mesma transação do registro).
    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        full_name: &str,
        role_id: Uuid,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, full_name, role_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(role_id)
        .fetch_one(executor)
        .await?;

        Ok(profile)
    }

    // ---
    // Papéis
    // ---

    pub async fn find_role_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    pub async fn find_role_by_slug(&self, slug: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    // ---
    // Painel de administração
    // ---

    // Um único JOIN resolve o que o sistema anterior juntava no cliente
    // (usuários do serviço de auth + perfis).
    pub async fn list_admin_rows(&self) -> Result<Vec<AdminUserRow>, AppError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            r#"
            SELECT
                u.id AS user_id,
                u.email,
                p.full_name,
                p.role_id,
                r.name AS role_name,
                p.is_admin,
                p.is_blocked,
                p.laboratory_id,
                l.name AS laboratory_name,
                u.created_at
            FROM users u
            JOIN profiles p ON p.user_id = u.id
            JOIN roles r ON r.id = p.role_id
            LEFT JOIN laboratories l ON l.id = p.laboratory_id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn set_blocked(&self, user_id: Uuid, blocked: bool) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET is_blocked = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;
        Ok(profile)
    }

    // Flag de admin e papel mudam juntos no rebaixamento; por isso o método
    // recebe os dois.
    pub async fn set_admin<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        is_admin: bool,
        role_id: Uuid,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET is_admin = $2, role_id = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(is_admin)
        .bind(role_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::UserNotFound)?;
        Ok(profile)
    }

    pub async fn set_role(&self, user_id: Uuid, role_id: Uuid) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET role_id = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;
        Ok(profile)
    }

    pub async fn set_laboratory(
        &self,
        user_id: Uuid,
        laboratory_id: Option<Uuid>,
    ) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET laboratory_id = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(laboratory_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            // Laboratório inexistente chega como violação de FK
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound;
                }
            }
            e.into()
        })?
        .ok_or(AppError::UserNotFound)?;
        Ok(profile)
    }

    pub async fn set_selected_area(&self, user_id: Uuid, area: &str) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET selected_area = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(area)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;
        Ok(profile)
    }
}
