// ==========================================
// Exam Center - Hall assignment domain model
// ==========================================
// SessionHall: capacity planning (hall allocated to a session/department pair)
// StudentHallAssignment: placement output, one row per seated student
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHall {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
    pub hall_id: String,
}

// ==========================================
// StudentHallAssignment
// ==========================================
// For one (session, department) the assigned students form a partition
// of the unique registered-student set once placement is saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentHallAssignment {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
    pub hall_id: String,
    pub student_id: String,
}

impl StudentHallAssignment {
    pub fn belongs_to(&self, session_id: &str, department_id: &str) -> bool {
        self.session_id == session_id && self.department_id == department_id
    }
}
