// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProfileRepository, UserRepository},
    models::{
        auth::{Claims, User},
        profile::{Profile, Role},
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        profile_repo: ProfileRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<String, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Todo usuário nasce com o papel padrão
        let default_role = self
            .profile_repo
            .find_role_by_slug("usuario")
            .await?
            .ok_or_else(|| anyhow::anyhow!("Papel padrão 'usuario' não existe no banco"))?;

        // --- INÍCIO DA TRANSAÇÃO ---
        // Usuário e perfil nascem juntos ou nada persiste.
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password)
            .await?;

        self.profile_repo
            .create_profile(&mut *tx, new_user.id, full_name, default_role.id)
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Usuário bloqueado não entra, mesmo com a senha certa
        let profile = self
            .profile_repo
            .find_by_user_id(user.id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if profile.is_blocked {
            return Err(AppError::UserBlocked);
        }

        self.create_token(user.id)
    }

    // Valida o token e carrega usuário + perfil + papel. O perfil é
    // revalidado a cada requisição: bloquear um usuário derruba o acesso
    // na hora.
    pub async fn validate_token(&self, token: &str) -> Result<(User, Profile, Role), AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let profile = self
            .profile_repo
            .find_by_user_id(user.id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if profile.is_blocked {
            return Err(AppError::UserBlocked);
        }

        let role = self
            .profile_repo
            .find_role_by_id(profile.role_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Perfil aponta para papel inexistente"))?;

        Ok((user, profile, role))
    }

    // ---
    // Redefinição de senha (token de uso único; a entrega fica fora daqui)
    // ---

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        // E-mail desconhecido responde igual: não vazamos quem existe.
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::info!("Pedido de redefinição para e-mail desconhecido");
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + chrono::Duration::hours(2);
        self.user_repo
            .insert_reset_token(user.id, &token, expires_at)
            .await?;

        // Sem serviço de e-mail: o token vai para o log do operador.
        tracing::info!("Token de redefinição emitido para o usuário {}", user.id);
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user_id = self
            .user_repo
            .consume_reset_token(token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let password_clone = new_password.to_owned();
        let hashed =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo.update_password(user_id, &hashed).await
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
