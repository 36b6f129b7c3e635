// ==========================================
// Exam Center - Student / enrollment domain model
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub student_no: i64,   // numeric student number printed on lists
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A student's enrollment in one course of an exam
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourseRegistration {
    pub id: String,
    pub exam_id: String,
    pub course_id: String,
    pub student_id: String,
}
