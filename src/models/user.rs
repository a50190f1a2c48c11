//! User model, roles and JWT claims

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

pub static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username regex"));

static PASSWORD_SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[!@#$%^&*()_+\-=\[\]{};:'"<>,./?\\|]"#).expect("special char regex"));

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion for Role (stored as TEXT)
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// JWT claims carried by the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Username
    pub sub: String,
    pub user_id: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Sign the claims into an HS256 token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Decode and verify a token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<UserClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &jsonwebtoken::Validation::default(),
        )?;
        Ok(data.claims)
    }

    /// Check the role claim against the route's allow-list
    pub fn require_role(&self, allowed: &[Role]) -> AppResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You do not have permission to access this resource".to_string(),
            ))
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username can only contain letters, numbers, and underscores"
    ))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: String,
}

/// Login / credential check request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update user request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username can only contain letters, numbers, and underscores"
    ))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = validate_password))]
    pub password: Option<String>,
}

/// Password policy: at least 8 characters, one uppercase letter, one digit
/// and one special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let has_min_len = password.len() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = PASSWORD_SPECIAL_RE.is_match(password);

    if !(has_min_len && has_upper && has_digit && has_special) {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password must be at least 8 characters long, contain an uppercase letter, \
             a number, and a special character"
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("role");
        err.message = Some("Invalid role".into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_too_short_is_rejected() {
        assert!(validate_password("Ab1!").is_err());
    }

    #[test]
    fn password_without_uppercase_is_rejected() {
        assert!(validate_password("abcdef1!").is_err());
    }

    #[test]
    fn password_without_digit_is_rejected() {
        assert!(validate_password("Abcdefg!").is_err());
    }

    #[test]
    fn password_without_special_char_is_rejected() {
        assert!(validate_password("Abcdefg1").is_err());
    }

    #[test]
    fn password_satisfying_all_rules_is_accepted() {
        assert!(validate_password("Abcdef1!").is_ok());
    }

    #[test]
    fn username_allows_word_characters_only() {
        assert!(USERNAME_RE.is_match("shilla_123"));
        assert!(!USERNAME_RE.is_match("shilla 123"));
        assert!(!USERNAME_RE.is_match("shilla@lib"));
        assert!(!USERNAME_RE.is_match(""));
    }

    #[test]
    fn role_parses_from_lowercase_slug() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("librarian".parse::<Role>().is_err());
    }

    #[test]
    fn claims_round_trip_through_token() {
        let claims = UserClaims {
            sub: "shilla".to_string(),
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let claims = UserClaims {
            sub: "shilla".to_string(),
            user_id: Uuid::new_v4(),
            role: Role::User,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn require_role_checks_allow_list_membership() {
        let claims = UserClaims {
            sub: "shilla".to_string(),
            user_id: Uuid::new_v4(),
            role: Role::User,
            exp: 0,
            iat: 0,
        };
        assert!(claims.require_role(&[Role::User, Role::Admin]).is_ok());
        assert!(claims.require_role(&[Role::Admin]).is_err());
    }
}
