// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Role, User},
};

// Autenticação (JWT + bcrypt) e gestão de usuários, que no CRM é uma ação
// exclusiva de admin.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    // Garante o admin inicial: roda uma única vez, quando a coleção de
    // usuários ainda está vazia.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if !self.user_repo.is_empty() {
            return Ok(());
        }
        let password_hash = self.hash_password(password).await?;
        self.user_repo
            .create_user("Administrador", email, &password_hash, Role::Admin)?;
        tracing::info!("👤 Admin inicial criado: {}", email);
        Ok(())
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: u64) -> Result<String, AppError> {
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

    // O hashing é caro; roda fora do executor async.
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(password_hash)
    }

    // =========================================================================
    //  GESTÃO DE USUÁRIOS (ação de admin)
    // =========================================================================

    pub fn list_users(&self) -> Vec<User> {
        self.user_repo.find_all()
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let password_hash = self.hash_password(password).await?;
        self.user_repo.create_user(name, email, &password_hash, role)
    }

    pub async fn update_user(
        &self,
        id: u64,
        name: &str,
        email: &str,
        password: Option<&str>,
        role: Role,
    ) -> Result<User, AppError> {
        let password_hash = match password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        self.user_repo
            .update_user(id, name, email, password_hash.as_deref(), role)
    }

    // O admin não pode excluir a si mesmo.
    pub fn delete_user(&self, id: u64, caller_id: u64) -> Result<(), AppError> {
        if id == caller_id {
            return Err(AppError::CannotDeleteSelf);
        }
        if !self.user_repo.delete_user(id) {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}
