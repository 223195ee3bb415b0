use crate::types::api::UserInfo;
use crate::types::role::Role;
use chrono::{DateTime, Utc};

/// Full user row, including the password hash. Stays inside the service
/// layer; handlers only ever see [`UserInfo`].
#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account; the id is assigned by storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for UserInfo {
    fn from(u: DbUser) -> Self {
        UserInfo {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}
