use crate::db::models::{DbUser, NewUser};
use crate::db::schema::SQLITE_INIT;
use crate::error::PortalError;
use crate::types::api::{StudentCreate, StudentRecord};
use crate::types::role::Role;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const DATE_FMT: &str = "%Y-%m-%d";

/// Storage layer for accounts and roster records. All SQL lives here; the
/// rest of the crate depends on this interface, not on SQLite itself.
#[derive(Clone)]
pub struct PortalStorage {
    pool: SqlitePool,
}

impl PortalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database and initialize the schema.
    pub async fn connect(database_url: &str) -> Result<Self, PortalError> {
        let connect_opts =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PortalError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ---- users ----

    /// Insert a new account and return its id. The caller checks for email
    /// duplicates first; the UNIQUE constraint is the backstop.
    pub async fn insert_user(&self, user: &NewUser) -> Result<i64, PortalError> {
        sqlx::query(
            r#"
            INSERT INTO users (name, email, role, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let rec: (i64,) = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>, PortalError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, role, password_hash, created_at
               FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<DbUser>, PortalError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, role, password_hash, created_at
               FROM users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn count_users(&self) -> Result<i64, PortalError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    // ---- students ----

    pub async fn insert_student(&self, data: &StudentCreate) -> Result<StudentRecord, PortalError> {
        let result = sqlx::query(
            r#"
            INSERT INTO students (name, email, course, enrollment_date, owner_user_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.course)
        .bind(data.enrollment_date.format(DATE_FMT).to_string())
        .bind(data.owner_user_id)
        .execute(&self.pool)
        .await?;

        Ok(StudentRecord {
            id: result.last_insert_rowid(),
            name: data.name.clone(),
            email: data.email.clone(),
            course: data.course.clone(),
            enrollment_date: data.enrollment_date,
            owner_user_id: data.owner_user_id,
        })
    }

    pub async fn list_students(&self) -> Result<Vec<StudentRecord>, PortalError> {
        let rows = sqlx::query(
            r#"SELECT id, name, email, course, enrollment_date, owner_user_id
               FROM students ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_student).collect()
    }

    pub async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentRecord>, PortalError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, course, enrollment_date, owner_user_id
               FROM students WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_student).transpose()
    }

    /// First record owned by the given user. At most one record per owner is
    /// assumed but not enforced.
    pub async fn get_student_by_owner(
        &self,
        owner_user_id: i64,
    ) -> Result<Option<StudentRecord>, PortalError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, course, enrollment_date, owner_user_id
               FROM students WHERE owner_user_id = ? ORDER BY id LIMIT 1"#,
        )
        .bind(owner_user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_student).transpose()
    }

    pub async fn student_email_exists(&self, email: &str) -> Result<bool, PortalError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0 > 0)
    }

    /// Write back a full record by id (except id itself).
    pub async fn update_student(&self, id: i64, record: &StudentRecord) -> Result<(), PortalError> {
        sqlx::query(
            r#"UPDATE students SET
                name = ?,
                email = ?,
                course = ?,
                enrollment_date = ?,
                owner_user_id = ?
              WHERE id = ?"#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.course)
        .bind(record.enrollment_date.format(DATE_FMT).to_string())
        .bind(record.owner_user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete by id; false when no such row existed.
    pub async fn delete_student(&self, id: i64) -> Result<bool, PortalError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_user(row: SqliteRow) -> Result<DbUser, PortalError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let email: String = row.try_get("email")?;
        let role_str: String = row.try_get("role")?;
        let password_hash: String = row.try_get("password_hash")?;
        let created_str: String = row.try_get("created_at")?;

        let role = Role::parse(&role_str).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown role in users table: {role_str}").into())
        })?;
        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbUser {
            id,
            name,
            email,
            role,
            password_hash,
            created_at,
        })
    }

    fn row_to_student(row: SqliteRow) -> Result<StudentRecord, PortalError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let email: String = row.try_get("email")?;
        let course: String = row.try_get("course")?;
        let date_str: String = row.try_get("enrollment_date")?;
        let owner_user_id: i64 = row.try_get("owner_user_id")?;

        let enrollment_date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(StudentRecord {
            id,
            name,
            email,
            course,
            enrollment_date,
            owner_user_id,
        })
    }
}
