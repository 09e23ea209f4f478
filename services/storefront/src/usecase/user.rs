use anyhow::Context as _;
use chrono::Utc;
use tracing::info;

use wafi_auth_types::identity::JwtSecret;
use wafi_auth_types::token::issue_token;
use wafi_domain::id::UserId;
use wafi_domain::user::UserRole;
use wafi_domain::validate::is_email;

use crate::domain::repository::{PasswordHasherPort, UserRepository};
use crate::domain::types::{FieldError, User};
use crate::error::StorefrontError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Signing key and lifetime for issued bearer tokens.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: JwtSecret,
    pub ttl_secs: i64,
}

impl TokenSettings {
    fn issue(&self, user: &User) -> Result<(String, i64), StorefrontError> {
        let issued = issue_token(user.id, user.role, &self.secret.0, self.ttl_secs)
            .context("issue access token")?;
        Ok(issued)
    }
}

/// A signed-in account together with its fresh token.
#[derive(Debug)]
pub struct AuthOutput {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl RegisterInput {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !is_email(&normalize_email(&self.email)) {
            errors.push(FieldError::new("email", "email is invalid"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "first name is required"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "last name is required"));
        }
        errors
    }
}

pub struct RegisterUseCase<R: UserRepository, H: PasswordHasherPort> {
    pub users: R,
    pub hasher: H,
    pub tokens: TokenSettings,
}

impl<R: UserRepository, H: PasswordHasherPort> RegisterUseCase<R, H> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, StorefrontError> {
        StorefrontError::check(input.validate())?;

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(StorefrontError::UserAlreadyExists);
        }

        let user = User {
            id: UserId::generate(),
            email,
            password_hash: self.hasher.hash(&input.password).await?,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            role: input.role,
            created_at: Utc::now(),
        };
        // The unique index settles races the lookup above misses.
        if !self.users.create(&user).await? {
            return Err(StorefrontError::UserAlreadyExists);
        }
        info!(user_id = %user.id, role = %user.role, "user registered");

        let (token, expires_at) = self.tokens.issue(&user)?;
        Ok(AuthOutput {
            token,
            expires_at,
            user,
        })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository, H: PasswordHasherPort> {
    pub users: R,
    pub hasher: H,
    pub tokens: TokenSettings,
}

impl<R: UserRepository, H: PasswordHasherPort> LoginUseCase<R, H> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, StorefrontError> {
        let user = self
            .users
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(StorefrontError::InvalidCredentials)?;

        if !self
            .hasher
            .verify(&input.password, &user.password_hash)
            .await?
        {
            return Err(StorefrontError::InvalidCredentials);
        }

        let (token, expires_at) = self.tokens.issue(&user)?;
        Ok(AuthOutput {
            token,
            expires_at,
            user,
        })
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, id: UserId) -> Result<User, StorefrontError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(StorefrontError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<User>, StorefrontError> {
        self.repo.list().await
    }
}
