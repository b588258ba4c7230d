// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, UserRepository},
    models::{
        auth::{Claims, User, UserRole},
        company::CompanyStatus,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    company_repo: CompanyRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        company_repo: CompanyRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            company_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação de senha em uma thread separada
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {e}"))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountInactive);
        }

        // Usuários de empresas não aprovadas não entram (o super_admin
        // não tem empresa e passa direto).
        if !user.role.is_super_admin() {
            if let Some(company_id) = user.company_id {
                let company = self
                    .company_repo
                    .find_by_id(company_id)
                    .await?
                    .ok_or(AppError::CompanyNotApproved)?;
                if company.status != CompanyStatus::Approved {
                    return Err(AppError::CompanyNotApproved);
                }
            }
        }

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Cria um usuário dentro da empresa de quem pediu.
    /// Um admin de empresa nunca cria super_admin.
    pub async fn create_user(
        &self,
        requester: &User,
        username: &str,
        password: &str,
        full_name: Option<&str>,
        email: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        if role.is_super_admin() && !requester.role.is_super_admin() {
            return Err(AppError::AccessDenied);
        }

        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {e}"))??;

        self.user_repo
            .create_user(
                &self.pool,
                username,
                &hashed_password,
                full_name,
                email,
                role,
                requester.company_id,
            )
            .await
    }

    pub async fn list_users(&self, requester: &User) -> Result<Vec<User>, AppError> {
        if requester.role.is_super_admin() {
            self.user_repo.list_all().await
        } else {
            self.user_repo.list_by_company(requester.company_id).await
        }
    }

    pub async fn delete_user(&self, requester: &User, user_id: Uuid) -> Result<(), AppError> {
        // Ninguém apaga a própria conta
        if requester.id == user_id {
            return Err(AppError::AccessDenied);
        }

        let target = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Admin de empresa só apaga usuários da própria empresa
        if !requester.role.is_super_admin() && target.company_id != requester.company_id {
            return Err(AppError::AccessDenied);
        }

        self.user_repo.delete_by_id(user_id).await
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
