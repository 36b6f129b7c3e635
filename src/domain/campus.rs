// ==========================================
// Exam Center - Campus domain model
// ==========================================
// School -> Department -> Course
// Building -> Hall
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub school_id: String,
    pub name: String,
}

// ==========================================
// Department
// ==========================================
// code: short label used to group printed lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: String,
    pub school_id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub department_id: String,
    pub code: String,
    pub name: String,
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub building_id: String,
    pub name: String,
}

// ==========================================
// Hall - seating unit of a building
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
    pub hall_id: String,
    pub building_id: String,
    pub name: String,
    pub capacity: u32,   // seats
    pub floor: String,   // floor label, e.g. "Z", "1"
}

/// Sum of hall capacities
pub fn total_capacity(halls: &[Hall]) -> u64 {
    halls.iter().map(|h| u64::from(h.capacity)).sum()
}
