//! Authentication and user management service

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
    models::user::{RegisterRequest, Role, UpdateUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user; the password is stored as an argon2 hash.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let role: Role = request
            .role
            .parse()
            .map_err(|_| AppError::validation("Invalid role", "role"))?;

        if self
            .repository
            .users
            .username_exists(&request.username, None)
            .await?
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if self
            .repository
            .users
            .email_exists(&request.email, None)
            .await?
        {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;

        self.repository
            .users
            .create(&request.username, &request.email, &password_hash, role)
            .await
    }

    /// Authenticate by username and password; returns a signed JWT and the user.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Check credentials without issuing a token.
    pub async fn validate_credentials(&self, username: &str, password: &str) -> AppResult<()> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::InvalidCredentials);
        }
        Ok(())
    }

    pub async fn get_all(&self) -> AppResult<Vec<User>> {
        self.repository.users.get_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Update a user; operates only on non-deleted users.
    pub async fn update(&self, id: Uuid, update: UpdateUser) -> AppResult<User> {
        update.validate()?;

        // Resolves to NotFound for missing or soft-deleted users.
        self.repository.users.get_by_id(id).await?;

        if let Some(ref username) = update.username {
            if self
                .repository
                .users
                .username_exists(username, Some(id))
                .await?
            {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }
        if let Some(ref email) = update.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = match update.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository
            .users
            .update(
                id,
                update.username.as_deref(),
                update.email.as_deref(),
                password_hash.as_deref(),
            )
            .await
    }

    /// Soft delete a user; re-deleting fails.
    pub async fn delete(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.soft_delete(id).await
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against the stored hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
