// ==========================================
// Exam Center - Student hall assignment repository
// ==========================================
// Table: student_hall_assignment
// replace_for_pair is the single logical write of a placement save
// ==========================================

use crate::domain::assignment::StudentHallAssignment;
use crate::engine::placement::AssignmentStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Replace every row of a (session, department) pair in one transaction
    ///
    /// # Returns
    /// - Ok(usize): rows written
    /// - Err: nothing changed (transaction rolled back)
    pub fn replace_for_pair(
        &self,
        session_id: &str,
        department_id: &str,
        rows: &[StudentHallAssignment],
    ) -> RepositoryResult<usize> {
        if let Some(stray) = rows.iter().find(|r| !r.belongs_to(session_id, department_id)) {
            return Err(RepositoryError::ValidationError(format!(
                "row {} belongs to session={} department={}",
                stray.id, stray.session_id, stray.department_id
            )));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        tx.execute(
            "DELETE FROM student_hall_assignment WHERE session_id = ?1 AND department_id = ?2",
            params![session_id, department_id],
        )?;

        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO student_hall_assignment
                    (id, session_id, department_id, hall_id, student_id, seq)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for (seq, row) in rows.iter().enumerate() {
                written += stmt.execute(params![
                    row.id,
                    row.session_id,
                    row.department_id,
                    row.hall_id,
                    row.student_id,
                    seq as i64
                ])?;
            }
        }

        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(written)
    }

    /// Drop the saved placement of a pair
    pub fn delete_for_pair(&self, session_id: &str, department_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM student_hall_assignment WHERE session_id = ?1 AND department_id = ?2",
            params![session_id, department_id],
        )?;
        Ok(affected)
    }

    pub fn find_by_pair(
        &self,
        session_id: &str,
        department_id: &str,
    ) -> RepositoryResult<Vec<StudentHallAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, session_id, department_id, hall_id, student_id
            FROM student_hall_assignment
            WHERE session_id = ?1 AND department_id = ?2
            ORDER BY seq
            "#,
        )?;
        let rows = stmt
            .query_map(params![session_id, department_id], map_row)?
            .collect::<SqliteResult<Vec<StudentHallAssignment>>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<StudentHallAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, session_id, department_id, hall_id, student_id
            FROM student_hall_assignment
            ORDER BY session_id, department_id, seq
            "#,
        )?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<StudentHallAssignment>>>()?;
        Ok(rows)
    }
}

impl AssignmentStore for AssignmentRepository {
    type Error = RepositoryError;

    fn replace_assignments(
        &self,
        session_id: &str,
        department_id: &str,
        rows: &[StudentHallAssignment],
    ) -> RepositoryResult<usize> {
        self.replace_for_pair(session_id, department_id, rows)
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<StudentHallAssignment> {
    Ok(StudentHallAssignment {
        id: row.get(0)?,
        session_id: row.get(1)?,
        department_id: row.get(2)?,
        hall_id: row.get(3)?,
        student_id: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;

    fn repo() -> (Arc<Mutex<Connection>>, AssignmentRepository) {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), AssignmentRepository::from_connection(conn))
    }

    #[test]
    fn test_rows_of_another_pair_are_rejected() {
        let (_conn, repo) = repo();
        let stray = StudentHallAssignment {
            id: "A1".to_string(),
            session_id: "S2".to_string(),
            department_id: "D1".to_string(),
            hall_id: "H1".to_string(),
            student_id: "ST1".to_string(),
        };
        assert!(matches!(
            repo.replace_for_pair("S1", "D1", &[stray]),
            Err(RepositoryError::ValidationError(_))
        ));
    }

    #[test]
    fn test_nested_begin_is_a_transaction_error() {
        let (conn, repo) = repo();
        conn.lock().unwrap().execute_batch("BEGIN").unwrap();

        assert!(matches!(
            repo.replace_for_pair("S1", "D1", &[]),
            Err(RepositoryError::DatabaseTransactionError(_))
        ));
    }
}
