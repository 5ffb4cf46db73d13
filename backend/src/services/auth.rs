//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::models::{User, UserType};

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};
use crate::store::{NewUser, SharedStore};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: SharedStore,
    jwt_secret: String,
    access_token_expiry: i64,
    bcrypt_cost: u32,
}

/// Input for registering a user
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub user_type: UserType,
}

/// Login credentials
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub user_type: UserType,
    /// Display name, shown as the farmer of activities the user records
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued access token with the user it belongs to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Decode and validate a token signed with `secret`
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: SharedStore, config: &AuthConfig) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            access_token_expiry: config.access_token_expiry,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Register a new owner or farmer account and log it in
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthTokens> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();

        if self.store.find_user_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "registration with an email already in use");
            return Err(AppError::UserAlreadyExists(email));
        }

        let password_hash = hash(&input.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self
            .store
            .insert_user(NewUser {
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                email,
                password_hash,
                user_type: input.user_type,
            })
            .await?;

        tracing::info!(user_id = %user.id, user_type = %user.user_type, "User registered");
        self.generate_tokens(user)
    }

    /// Authenticate user with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();

        let row = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            tracing::warn!(email = %email, "failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        let user = row.to_user()?;
        tracing::info!(user_id = %user.id, "User logged in");
        self.generate_tokens(user)
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.jwt_secret)
    }

    fn generate_tokens(&self, user: User) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user.id.to_string(),
            user_type: user.user_type,
            name: user.display_name(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user,
        })
    }

    /// Look up a user, failing when the id is unknown
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .fetch_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// All registered farmers, for assigning activities
    pub async fn list_farmers(&self) -> AppResult<Vec<User>> {
        self.store.fetch_users_by_type(UserType::Farmer).await
    }
}
