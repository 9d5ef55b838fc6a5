//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
///
/// Foreign keys are per-connection in SQLite, so the pragma runs with the
/// schema on every open.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    city TEXT NOT NULL,
    postal_code TEXT,
    role TEXT NOT NULL DEFAULT 'user',
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

-- Advice table
CREATE TABLE IF NOT EXISTS advice (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Periods table
CREATE TABLE IF NOT EXISTS periods (
    id TEXT PRIMARY KEY,
    advice_id TEXT NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    UNIQUE (advice_id, month, year),
    FOREIGN KEY (advice_id) REFERENCES advice(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_advice_user_id ON advice(user_id);
CREATE INDEX IF NOT EXISTS idx_periods_month_year ON periods(month, year);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, email, city, postal_code, role, password_hash, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, email, city, postal_code, role, password_hash, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, email, city, postal_code, role, password_hash, created_at, updated_at
FROM users
WHERE email = ?1
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET email = ?2, city = ?3, postal_code = ?4, role = ?5, password_hash = ?6, updated_at = ?7
WHERE id = ?1
"#;

pub const DELETE_USER: &str = r#"
DELETE FROM users
WHERE id = ?1
"#;

// Advice queries
pub const INSERT_ADVICE: &str = r#"
INSERT INTO advice (id, user_id, content, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_ADVICE_BY_ID: &str = r#"
SELECT id, user_id, content, created_at, updated_at
FROM advice
WHERE id = ?1
"#;

pub const SELECT_ADVICE_BY_PERIOD: &str = r#"
SELECT a.id, a.user_id, a.content, a.created_at, a.updated_at
FROM advice a
JOIN periods p ON p.advice_id = a.id
WHERE p.month = ?1 AND p.year = ?2
ORDER BY a.created_at DESC
"#;

pub const UPDATE_ADVICE_CONTENT: &str = r#"
UPDATE advice
SET content = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const TOUCH_ADVICE: &str = r#"
UPDATE advice
SET updated_at = ?2
WHERE id = ?1
"#;

pub const DELETE_ADVICE: &str = r#"
DELETE FROM advice
WHERE id = ?1
"#;

// Period queries
pub const INSERT_PERIOD: &str = r#"
INSERT INTO periods (id, advice_id, month, year)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_PERIODS_BY_ADVICE: &str = r#"
SELECT id, advice_id, month, year
FROM periods
WHERE advice_id = ?1
ORDER BY year ASC, month ASC
"#;

pub const SELECT_PERIOD_BY_KEY: &str = r#"
SELECT id, advice_id, month, year
FROM periods
WHERE advice_id = ?1 AND month = ?2 AND year = ?3
"#;

pub const DELETE_PERIOD: &str = r#"
DELETE FROM periods
WHERE id = ?1 AND advice_id = ?2
"#;
