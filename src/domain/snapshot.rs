// ==========================================
// Exam Center - Entity snapshot
// ==========================================
// Immutable view of every entity collection, handed to the
// resolver and the placement engine as plain arguments
// ==========================================

use crate::domain::assignment::{SessionHall, StudentHallAssignment};
use crate::domain::campus::{Building, Course, Department, Hall, School};
use crate::domain::enrollment::{Student, StudentCourseRegistration};
use crate::domain::exam::{Exam, ExamSession, SessionCourse, SessionDepartment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub schools: Vec<School>,
    pub departments: Vec<Department>,
    pub buildings: Vec<Building>,
    pub halls: Vec<Hall>,
    pub courses: Vec<Course>,
    pub students: Vec<Student>,
    pub exams: Vec<Exam>,
    pub sessions: Vec<ExamSession>,
    pub session_departments: Vec<SessionDepartment>,
    pub session_courses: Vec<SessionCourse>,
    pub session_halls: Vec<SessionHall>,
    pub registrations: Vec<StudentCourseRegistration>,
    pub assignments: Vec<StudentHallAssignment>,
}

impl EntitySnapshot {
    pub fn exam(&self, exam_id: &str) -> Option<&Exam> {
        self.exams.iter().find(|e| e.exam_id == exam_id)
    }

    pub fn session(&self, session_id: &str) -> Option<&ExamSession> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }

    pub fn department(&self, department_id: &str) -> Option<&Department> {
        self.departments
            .iter()
            .find(|d| d.department_id == department_id)
    }

    pub fn hall(&self, hall_id: &str) -> Option<&Hall> {
        self.halls.iter().find(|h| h.hall_id == hall_id)
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    pub fn building(&self, building_id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.building_id == building_id)
    }

    /// Persisted assignment rows of one (session, department) pair
    pub fn assignments_for(
        &self,
        session_id: &str,
        department_id: &str,
    ) -> Vec<StudentHallAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.belongs_to(session_id, department_id))
            .cloned()
            .collect()
    }
}
