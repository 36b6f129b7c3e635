// ==========================================
// Exam Center - Exam repository
// ==========================================
// Tables: exam, exam_session, session_department, session_course
// ==========================================

use crate::domain::exam::{Exam, ExamSession, SessionCourse, SessionDepartment};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct ExamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExamRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== exam =====

    pub fn insert_exam(&self, exam: &Exam) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO exam (exam_id, name, is_active, closing_date) VALUES (?1, ?2, ?3, ?4)",
            params![exam.exam_id, exam.name, exam.is_active, exam.closing_date],
        )?;
        Ok(())
    }

    pub fn set_active(&self, exam_id: &str, is_active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE exam SET is_active = ?1 WHERE exam_id = ?2",
            params![is_active, exam_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Exam".to_string(),
                id: exam_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_exam(&self, exam_id: &str) -> RepositoryResult<Option<Exam>> {
        let conn = self.get_conn()?;
        let exam = conn
            .query_row(
                "SELECT exam_id, name, is_active, closing_date FROM exam WHERE exam_id = ?1",
                params![exam_id],
                map_exam,
            )
            .optional()?;
        Ok(exam)
    }

    pub fn list_exams(&self) -> RepositoryResult<Vec<Exam>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT exam_id, name, is_active, closing_date FROM exam ORDER BY closing_date DESC",
        )?;
        let rows = stmt
            .query_map([], map_exam)?
            .collect::<SqliteResult<Vec<Exam>>>()?;
        Ok(rows)
    }

    // ===== session =====

    pub fn insert_session(&self, session: &ExamSession) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO exam_session (session_id, exam_id, starts_at, sequence_no)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                session.session_id,
                session.exam_id,
                session.starts_at,
                session.sequence_no
            ],
        )?;
        Ok(())
    }

    /// Sessions of an exam, ascending by date
    pub fn find_sessions_by_exam(&self, exam_id: &str) -> RepositoryResult<Vec<ExamSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT session_id, exam_id, starts_at, sequence_no
            FROM exam_session
            WHERE exam_id = ?1
            ORDER BY starts_at, sequence_no
            "#,
        )?;
        let rows = stmt
            .query_map(params![exam_id], map_session)?
            .collect::<SqliteResult<Vec<ExamSession>>>()?;
        Ok(rows)
    }

    pub fn list_sessions(&self) -> RepositoryResult<Vec<ExamSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT session_id, exam_id, starts_at, sequence_no FROM exam_session ORDER BY starts_at, sequence_no",
        )?;
        let rows = stmt
            .query_map([], map_session)?
            .collect::<SqliteResult<Vec<ExamSession>>>()?;
        Ok(rows)
    }

    // ===== session joins =====

    pub fn add_session_department(&self, row: &SessionDepartment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO session_department (id, session_id, department_id) VALUES (?1, ?2, ?3)",
            params![row.id, row.session_id, row.department_id],
        )?;
        Ok(())
    }

    pub fn list_session_departments(&self) -> RepositoryResult<Vec<SessionDepartment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, session_id, department_id FROM session_department ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SessionDepartment {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    department_id: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<SessionDepartment>>>()?;
        Ok(rows)
    }

    pub fn add_session_course(&self, row: &SessionCourse) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO session_course (id, session_id, course_id) VALUES (?1, ?2, ?3)",
            params![row.id, row.session_id, row.course_id],
        )?;
        Ok(())
    }

    pub fn list_session_courses(&self) -> RepositoryResult<Vec<SessionCourse>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, session_id, course_id FROM session_course ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SessionCourse {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    course_id: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<SessionCourse>>>()?;
        Ok(rows)
    }
}

fn map_exam(row: &Row<'_>) -> SqliteResult<Exam> {
    Ok(Exam {
        exam_id: row.get(0)?,
        name: row.get(1)?,
        is_active: row.get(2)?,
        closing_date: row.get(3)?,
    })
}

fn map_session(row: &Row<'_>) -> SqliteResult<ExamSession> {
    Ok(ExamSession {
        session_id: row.get(0)?,
        exam_id: row.get(1)?,
        starts_at: row.get(2)?,
        sequence_no: row.get(3)?,
    })
}
