//! Wire types for the portal API. Field names are camelCase to stay
//! compatible with the original web client.

use crate::types::role::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course: String,
    pub enrollment_date: NaiveDate,
    pub owner_user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreate {
    pub name: String,
    pub email: String,
    pub course: String,
    pub enrollment_date: NaiveDate,
    /// Seed records may have no owning account yet.
    #[serde(default)]
    pub owner_user_id: i64,
}

/// Partial update; fields left out keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub owner_user_id: Option<i64>,
}

impl StudentPatch {
    pub fn apply(self, record: &mut StudentRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(course) = self.course {
            record.course = course;
        }
        if let Some(enrollment_date) = self.enrollment_date {
            record.enrollment_date = enrollment_date;
        }
        if let Some(owner_user_id) = self.owner_user_id {
            record.owner_user_id = owner_user_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> StudentRecord {
        StudentRecord {
            id: 7,
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            course: "Full Stack Development".to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid date"),
            owner_user_id: 3,
        }
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut record = sample_record();
        let patch: StudentPatch =
            serde_json::from_str(r#"{"course": "Rust Systems"}"#).expect("valid patch");
        patch.apply(&mut record);

        assert_eq!(record.course, "Rust Systems");
        let untouched = sample_record();
        assert_eq!(record.name, untouched.name);
        assert_eq!(record.email, untouched.email);
        assert_eq!(record.enrollment_date, untouched.enrollment_date);
        assert_eq!(record.owner_user_id, untouched.owner_user_id);
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(sample_record()).expect("serialize");
        assert_eq!(json["enrollmentDate"], "2024-01-20");
        assert_eq!(json["ownerUserId"], 3);
    }
}
