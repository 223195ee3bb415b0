//! SQL DDL for initializing the portal storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `users`: one row per account, `email` UNIQUE, `role` stored as text
///   (`admin`/`student`), `created_at` as RFC3339
/// - `students`: one roster record per row, `enrollment_date` as `YYYY-MM-DD`,
///   `owner_user_id` linking back to the owning account (0 = unowned seed)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    course TEXT NOT NULL,
    enrollment_date TEXT NOT NULL,
    owner_user_id INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_students_owner_user_id ON students(owner_user_id);
"#;
