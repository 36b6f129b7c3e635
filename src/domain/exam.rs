// ==========================================
// Exam Center - Exam / Session domain model
// ==========================================
// Exam -> Session -> (SessionDepartment, SessionCourse)
// Entities reference each other through id fields only
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Exam
// ==========================================
// Only active exams take part in session/placement operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub exam_id: String,
    pub name: String,
    pub is_active: bool,
    pub closing_date: NaiveDate,
}

// ==========================================
// Session - one sitting of an exam
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    pub session_id: String,
    pub exam_id: String,
    pub starts_at: NaiveDateTime,
    pub sequence_no: i32,
}

/// Department taking part in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDepartment {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
}

/// Course examined in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCourse {
    pub id: String,
    pub session_id: String,
    pub course_id: String,
}
