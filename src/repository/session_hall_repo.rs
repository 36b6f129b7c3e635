// ==========================================
// Exam Center - Session hall repository
// ==========================================
// Table: session_hall (hall allocated to a session/department pair)
// Write boundary of the hall exclusivity rule:
//   within one session a hall serves a single department (policy REJECT)
// ==========================================

use crate::domain::assignment::SessionHall;
use crate::domain::types::HallExclusivity;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::warn;

pub struct SessionHallRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SessionHallRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Allocate a hall to a (session, department) pair
    ///
    /// # Returns
    /// - Ok(SessionHall): the new row, or the existing one when already allocated
    /// - Err(HallOccupied): another department holds the hall and policy is REJECT
    pub fn add(&self, row: &SessionHall, policy: HallExclusivity) -> RepositoryResult<SessionHall> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        let existing = tx
            .query_row(
                r#"
                SELECT id, session_id, department_id, hall_id
                FROM session_hall
                WHERE session_id = ?1 AND department_id = ?2 AND hall_id = ?3
                "#,
                params![row.session_id, row.department_id, row.hall_id],
                map_row,
            )
            .optional()?;
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let holder: Option<String> = tx
            .query_row(
                r#"
                SELECT department_id FROM session_hall
                WHERE session_id = ?1 AND hall_id = ?2 AND department_id <> ?3
                LIMIT 1
                "#,
                params![row.session_id, row.hall_id, row.department_id],
                |r| r.get(0),
            )
            .optional()?;

        if let Some(department_id) = holder {
            match policy {
                HallExclusivity::Reject => {
                    return Err(RepositoryError::HallOccupied {
                        session_id: row.session_id.clone(),
                        hall_id: row.hall_id.clone(),
                        department_id,
                    });
                }
                HallExclusivity::Allow => {
                    warn!(
                        session_id = %row.session_id,
                        hall_id = %row.hall_id,
                        holder = %department_id,
                        "hall shared by two departments in one session"
                    );
                }
            }
        }

        let next_seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM session_hall WHERE session_id = ?1 AND department_id = ?2",
            params![row.session_id, row.department_id],
            |r| r.get(0),
        )?;

        tx.execute(
            r#"
            INSERT INTO session_hall (id, session_id, department_id, hall_id, seq)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![row.id, row.session_id, row.department_id, row.hall_id, next_seq],
        )?;
        tx.commit().map_err(RepositoryError::transaction)?;

        Ok(row.clone())
    }

    /// Remove one allocation
    pub fn remove(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM session_hall WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "SessionHall".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Halls of a pair, in allocation order
    pub fn find_by_pair(&self, session_id: &str, department_id: &str) -> RepositoryResult<Vec<SessionHall>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, session_id, department_id, hall_id
            FROM session_hall
            WHERE session_id = ?1 AND department_id = ?2
            ORDER BY seq
            "#,
        )?;
        let rows = stmt
            .query_map(params![session_id, department_id], map_row)?
            .collect::<SqliteResult<Vec<SessionHall>>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<SessionHall>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, session_id, department_id, hall_id FROM session_hall ORDER BY session_id, department_id, seq",
        )?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<SessionHall>>>()?;
        Ok(rows)
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<SessionHall> {
    Ok(SessionHall {
        id: row.get(0)?,
        session_id: row.get(1)?,
        department_id: row.get(2)?,
        hall_id: row.get(3)?,
    })
}
