// ==========================================
// Exam Center - Snapshot repository
// ==========================================
// Reads every table into one immutable EntitySnapshot
// ==========================================

use crate::domain::snapshot::EntitySnapshot;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::campus_repo::CampusRepository;
use crate::repository::error::RepositoryResult;
use crate::repository::exam_repo::ExamRepository;
use crate::repository::session_hall_repo::SessionHallRepository;
use crate::repository::student_repo::StudentRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct SnapshotRepository {
    campus: CampusRepository,
    students: StudentRepository,
    exams: ExamRepository,
    session_halls: SessionHallRepository,
    assignments: AssignmentRepository,
}

impl SnapshotRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            campus: CampusRepository::from_connection(conn.clone()),
            students: StudentRepository::from_connection(conn.clone()),
            exams: ExamRepository::from_connection(conn.clone()),
            session_halls: SessionHallRepository::from_connection(conn.clone()),
            assignments: AssignmentRepository::from_connection(conn),
        }
    }

    pub fn load(&self) -> RepositoryResult<EntitySnapshot> {
        let snapshot = EntitySnapshot {
            schools: self.campus.list_schools()?,
            departments: self.campus.list_departments()?,
            buildings: self.campus.list_buildings()?,
            halls: self.campus.list_halls()?,
            courses: self.campus.list_courses()?,
            students: self.students.list_students()?,
            exams: self.exams.list_exams()?,
            sessions: self.exams.list_sessions()?,
            session_departments: self.exams.list_session_departments()?,
            session_courses: self.exams.list_session_courses()?,
            session_halls: self.session_halls.list_all()?,
            registrations: self.students.list_registrations()?,
            assignments: self.assignments.list_all()?,
        };

        debug!(
            students = snapshot.students.len(),
            sessions = snapshot.sessions.len(),
            assignments = snapshot.assignments.len(),
            "entity snapshot loaded"
        );
        Ok(snapshot)
    }
}
