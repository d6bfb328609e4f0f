//! Authentication service: registration, login, token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        user::{LoginRequest, RegisterUser, Role, User, UserClaims},
        validation_message,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and return a token for it
    pub async fn register(&self, payload: RegisterUser) -> AppResult<String> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(validation_message(&e)))?;

        if payload.name.trim().is_empty() {
            return Err(AppError::Validation("Please add a name".to_string()));
        }

        if self.repository.users.email_exists(&payload.email).await? {
            return Err(AppError::Validation("User already exists".to_string()));
        }

        let hash = self.hash_password(&payload.password)?;
        let user = self
            .repository
            .users
            .create(
                payload.name.trim(),
                &payload.email,
                &hash,
                payload.role.unwrap_or(Role::User),
            )
            .await?;

        self.issue_token(&user)
    }

    /// Authenticate by email and password and return a token.
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, payload: LoginRequest) -> AppResult<String> {
        let (email, password) = match (payload.email.as_deref(), payload.password.as_deref()) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
            _ => {
                return Err(AppError::Validation(
                    "Please provide an email and password".to_string(),
                ))
            }
        };

        let user = self
            .repository
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.issue_token(&user)
    }

    /// Current identity behind a verified token
    pub async fn me(&self, user_id: Uuid) -> AppResult<User> {
        self.repository
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Not authorized to access this route".to_string())
            })
    }

    /// Issue a signed token carrying the user id, role and expiry
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
