use anyhow::Context as _;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::repository::PasswordHasherPort;
use crate::error::StorefrontError;

/// Argon2id with default parameters, hashed on the blocking pool.
#[derive(Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasherPort for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, StorefrontError> {
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
            anyhow::Ok(hash.to_string())
        })
        .await
        .context("join password hashing task")??;
        Ok(hash)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, StorefrontError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let matches = tokio::task::spawn_blocking(move || {
            let parsed =
                PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!("parse password hash: {e}"))?;
            anyhow::Ok(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
            )
        })
        .await
        .context("join password verification task")??;
        Ok(matches)
    }
}
