//! Credential checks and account creation, shared by the sessions actor and
//! the startup bootstrap path.

use crate::db::models::NewUser;
use crate::db::sqlite::PortalStorage;
use crate::error::PortalError;
use crate::types::api::{SignupRequest, StudentCreate};
use crate::types::role::Role;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use chrono::Utc;
use rand::RngCore;
use tracing::info;

/// Course assigned to a fresh student account until an admin sets one.
pub const UNASSIGNED_COURSE: &str = "Not Assigned";

#[derive(Clone)]
pub struct AuthOps {
    storage: PortalStorage,
}

impl AuthOps {
    pub fn new(storage: PortalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &PortalStorage {
        &self.storage
    }

    /// Resolve email + password to the stored account. Both unknown email and
    /// wrong password collapse into `InvalidCredentials`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<crate::db::models::DbUser, PortalError> {
        let user = self
            .storage
            .get_user_by_email(email)
            .await?
            .ok_or(PortalError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(PortalError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Create an account; for students, also create their roster record with
    /// an unassigned course and today's enrollment date.
    pub async fn signup(
        &self,
        req: SignupRequest,
    ) -> Result<crate::db::models::DbUser, PortalError> {
        if self.storage.get_user_by_email(&req.email).await?.is_some() {
            return Err(PortalError::EmailTaken);
        }

        let now = Utc::now();
        let new_user = NewUser {
            name: req.name,
            email: req.email,
            role: req.role,
            password_hash: hash_password(&req.password)?,
            created_at: now,
        };
        let id = self.storage.insert_user(&new_user).await?;

        if new_user.role == Role::Student {
            let record = self
                .storage
                .insert_student(&StudentCreate {
                    name: new_user.name.clone(),
                    email: new_user.email.clone(),
                    course: UNASSIGNED_COURSE.to_string(),
                    enrollment_date: now.date_naive(),
                    owner_user_id: id,
                })
                .await?;
            info!(
                user_id = id,
                record_id = record.id,
                "roster record created for new student"
            );
        }

        Ok(crate::db::models::DbUser {
            id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            password_hash: new_user.password_hash,
            created_at: new_user.created_at,
        })
    }

    /// Create the configured admin account when the users table is empty.
    /// Returns the new id, or None when accounts already exist.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<i64>, PortalError> {
        if self.storage.count_users().await? > 0 {
            return Ok(None);
        }
        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Admin,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        let id = self.storage.insert_user(&new_user).await?;
        Ok(Some(id))
    }
}

/// Opaque bearer token: 32 random bytes, base64-url encoded.
pub fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_password(password: &str) -> Result<String, PortalError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PortalError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("secret1").expect("hashing");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn minted_tokens_are_distinct() {
        let a = mint_token();
        let b = mint_token();
        assert_ne!(a, b);
        assert!(a.len() >= 40);
    }
}
