//! Authentication service: password hashing, token issuance, registration

use chrono::Utc;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{Claims, LoginRequest, RegisterRequest, Role, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    admin: AdminConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, admin: AdminConfig) -> Self {
        Self {
            repository,
            config,
            admin,
        }
    }

    /// Register a new account and return a token for it
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(String, User)> {
        let email = normalize_email(&request.email);

        if self.repository.users.email_exists(&email).await? {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let hash = self.hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(&email, &hash, &request.name, Role::User)
            .await?;

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    /// Authenticate by email and password and return a token.
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, User)> {
        let email = normalize_email(&request.email);

        let user = self
            .repository
            .users
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Authentication("invalid credentials".to_string()))?;

        if !verify_password(&request.password, &user.password) {
            return Err(AppError::Authentication("invalid credentials".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    /// Create a signed, time-limited JWT for a user
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = Claims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Seed the admin account at startup if it does not exist yet
    pub async fn ensure_admin(&self) -> AppResult<()> {
        let email = normalize_email(&self.admin.email);

        if self.repository.users.get_by_email(&email).await?.is_some() {
            tracing::debug!("admin already exists: {}", email);
            return Ok(());
        }

        let hash = self.hash_password(&self.admin.password)?;
        self.repository
            .users
            .create(&email, &hash, &self.admin.name, Role::Admin)
            .await?;

        tracing::info!("Admin user created: {}", email);
        Ok(())
    }

    /// Hash a password using bcrypt
    fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
