// ==========================================
// Exam Center - SQLite connection setup
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA setup
// - one idempotent schema bootstrap shared by the app, the CLI and tests
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version written by `initialize_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Per-connection PRAGMA setup
///
/// foreign_keys and busy_timeout must be set on every connection.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a connection with the shared setup applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS school (
    school_id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS department (
    department_id TEXT PRIMARY KEY,
    school_id TEXT NOT NULL REFERENCES school(school_id),
    name TEXT NOT NULL,
    code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS building (
    building_id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS hall (
    hall_id TEXT PRIMARY KEY,
    building_id TEXT NOT NULL REFERENCES building(building_id),
    name TEXT NOT NULL,
    capacity INTEGER NOT NULL CHECK (capacity >= 0),
    floor TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS course (
    course_id TEXT PRIMARY KEY,
    department_id TEXT NOT NULL REFERENCES department(department_id),
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    teacher_id TEXT
);

CREATE TABLE IF NOT EXISTS student (
    student_id TEXT PRIMARY KEY,
    student_no INTEGER NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exam (
    exam_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    closing_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exam_session (
    session_id TEXT PRIMARY KEY,
    exam_id TEXT NOT NULL REFERENCES exam(exam_id) ON DELETE CASCADE,
    starts_at TEXT NOT NULL,
    sequence_no INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS session_department (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES exam_session(session_id) ON DELETE CASCADE,
    department_id TEXT NOT NULL REFERENCES department(department_id),
    UNIQUE (session_id, department_id)
);

CREATE TABLE IF NOT EXISTS session_course (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES exam_session(session_id) ON DELETE CASCADE,
    course_id TEXT NOT NULL REFERENCES course(course_id),
    UNIQUE (session_id, course_id)
);

CREATE TABLE IF NOT EXISTS session_hall (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES exam_session(session_id) ON DELETE CASCADE,
    department_id TEXT NOT NULL REFERENCES department(department_id),
    hall_id TEXT NOT NULL REFERENCES hall(hall_id),
    seq INTEGER NOT NULL,
    UNIQUE (session_id, department_id, hall_id)
);

CREATE TABLE IF NOT EXISTS student_course_registration (
    id TEXT PRIMARY KEY,
    exam_id TEXT NOT NULL REFERENCES exam(exam_id) ON DELETE CASCADE,
    course_id TEXT NOT NULL REFERENCES course(course_id),
    student_id TEXT NOT NULL REFERENCES student(student_id),
    UNIQUE (exam_id, course_id, student_id)
);

CREATE TABLE IF NOT EXISTS student_hall_assignment (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES exam_session(session_id) ON DELETE CASCADE,
    department_id TEXT NOT NULL REFERENCES department(department_id),
    hall_id TEXT NOT NULL REFERENCES hall(hall_id),
    student_id TEXT NOT NULL REFERENCES student(student_id),
    seq INTEGER NOT NULL,
    UNIQUE (session_id, department_id, student_id)
);

CREATE INDEX IF NOT EXISTS idx_sha_pair ON student_hall_assignment(session_id, department_id);
CREATE INDEX IF NOT EXISTS idx_session_hall_pair ON session_hall(session_id, department_id);
"#;

/// Create all tables (idempotent) and record the schema version
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Default database location
///
/// `EXAM_CENTER_DB` wins; otherwise `<data_dir>/exam-center/exam_center.db`.
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("EXAM_CENTER_DB") {
        if !path.trim().is_empty() {
            return path;
        }
    }

    match dirs::data_dir() {
        Some(dir) => {
            let dir = dir.join("exam-center");
            if let Err(e) = std::fs::create_dir_all(&dir) {
                tracing::warn!("cannot create data dir {}: {}", dir.display(), e);
            }
            dir.join("exam_center.db").to_string_lossy().to_string()
        }
        None => "exam_center.db".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }
}
