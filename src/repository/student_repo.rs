// ==========================================
// Exam Center - Student repository
// ==========================================
// Tables: student, student_course_registration
// ==========================================

use crate::domain::enrollment::{Student, StudentCourseRegistration};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert_student(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO student (student_id, student_no, first_name, last_name)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                student.student_id,
                student.student_no,
                student.first_name,
                student.last_name
            ],
        )?;
        Ok(())
    }

    /// Bulk insert in one transaction
    pub fn insert_students(&self, students: &[Student]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO student (student_id, student_no, first_name, last_name) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for s in students {
                count += stmt.execute(params![s.student_id, s.student_no, s.first_name, s.last_name])?;
            }
        }
        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(count)
    }

    pub fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT student_id, student_no, first_name, last_name FROM student ORDER BY student_no",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Student {
                    student_id: row.get(0)?,
                    student_no: row.get(1)?,
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<Student>>>()?;
        Ok(rows)
    }

    // ===== registrations =====

    /// Register a student for an exam's course; re-registering is a no-op
    pub fn register(&self, registration: &StudentCourseRegistration) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            INSERT OR IGNORE INTO student_course_registration (id, exam_id, course_id, student_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                registration.id,
                registration.exam_id,
                registration.course_id,
                registration.student_id
            ],
        )?;
        Ok(affected > 0)
    }

    pub fn list_registrations(&self) -> RepositoryResult<Vec<StudentCourseRegistration>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, exam_id, course_id, student_id FROM student_course_registration ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StudentCourseRegistration {
                    id: row.get(0)?,
                    exam_id: row.get(1)?,
                    course_id: row.get(2)?,
                    student_id: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<StudentCourseRegistration>>>()?;
        Ok(rows)
    }
}
