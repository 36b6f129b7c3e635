// ==========================================
// Exam Center - Assignment resolver
// ==========================================
// Responsibility: derive the (session, department) work items of an exam
// Input: EntitySnapshot (read only)
// Output: WorkItem list (unique students + assigned halls per pair)
// ==========================================
// Pure derivation: no side effects, recomputed on every call
// ==========================================

use crate::domain::campus::{total_capacity, Department, Hall};
use crate::domain::enrollment::Student;
use crate::domain::exam::ExamSession;
use crate::domain::snapshot::EntitySnapshot;
use crate::domain::types::CapacityStatus;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

// ==========================================
// WorkItem - one (session, department) pair
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub session: ExamSession,
    pub department: Department,
    pub students: Vec<Student>, // unique eligible students
    pub halls: Vec<Hall>,       // halls allocated to the pair, in allocation order
}

impl WorkItem {
    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn department_id(&self) -> &str {
        &self.department.department_id
    }

    /// Number of unique eligible students
    pub fn unique_count(&self) -> usize {
        self.students.len()
    }

    pub fn total_capacity(&self) -> u64 {
        total_capacity(&self.halls)
    }

    pub fn capacity_status(&self) -> CapacityStatus {
        CapacityStatus::evaluate(self.total_capacity(), self.unique_count() as u64)
    }

    /// Placement is enabled only with at least one hall and enough seats
    pub fn can_place(&self) -> bool {
        !self.halls.is_empty() && self.capacity_status().is_sufficient()
    }
}

// ==========================================
// HallPlanRow - capacity planning view of a pair
// ==========================================
// Also covers pairs without eligible students
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallPlanRow {
    pub item: WorkItem,
    /// Halls of the same session already held by other departments
    pub occupied_hall_ids: Vec<String>,
}

// ==========================================
// AssignmentResolver
// ==========================================
pub struct AssignmentResolver {
    // stateless
}

impl Default for AssignmentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// Work items needing placement for an exam
    ///
    /// Pairs without eligible students are left out.
    /// Unknown or inactive exams yield an empty list.
    #[instrument(skip(self, snapshot), fields(sessions = snapshot.sessions.len()))]
    pub fn resolve(&self, exam_id: &str, snapshot: &EntitySnapshot) -> Vec<WorkItem> {
        let items: Vec<WorkItem> = self
            .resolve_all_pairs(exam_id, snapshot)
            .into_iter()
            .filter(|item| item.unique_count() > 0)
            .collect();

        debug!(work_items = items.len(), "resolved placement work items");
        items
    }

    /// Single work item for a (session, department) pair, zero-student pairs included
    pub fn resolve_pair(
        &self,
        session_id: &str,
        department_id: &str,
        snapshot: &EntitySnapshot,
    ) -> Option<WorkItem> {
        let session = snapshot.session(session_id)?;
        if !self.exam_is_active(&session.exam_id, snapshot) {
            return None;
        }
        let joined = snapshot
            .session_departments
            .iter()
            .any(|sd| sd.session_id == session_id && sd.department_id == department_id);
        if !joined {
            return None;
        }
        let department = snapshot.department(department_id)?;
        Some(self.build_item(&session.exam_id, session, department, snapshot))
    }

    /// Capacity planning rows: every pair of the exam, with occupied-hall marking
    pub fn hall_plan(&self, exam_id: &str, snapshot: &EntitySnapshot) -> Vec<HallPlanRow> {
        self.resolve_all_pairs(exam_id, snapshot)
            .into_iter()
            .map(|item| {
                let occupied_hall_ids =
                    occupied_halls(item.session_id(), item.department_id(), snapshot);
                HallPlanRow {
                    item,
                    occupied_hall_ids,
                }
            })
            .collect()
    }

    // ==========================================
    // Internals
    // ==========================================

    fn exam_is_active(&self, exam_id: &str, snapshot: &EntitySnapshot) -> bool {
        match snapshot.exam(exam_id) {
            Some(exam) => exam.is_active,
            None => false,
        }
    }

    fn resolve_all_pairs(&self, exam_id: &str, snapshot: &EntitySnapshot) -> Vec<WorkItem> {
        if !self.exam_is_active(exam_id, snapshot) {
            debug!(exam_id, "exam missing or inactive, nothing to resolve");
            return Vec::new();
        }

        // 1) sessions of the exam, ascending by date
        let mut sessions: Vec<&ExamSession> = snapshot
            .sessions
            .iter()
            .filter(|s| s.exam_id == exam_id)
            .collect();
        sessions.sort_by(|a, b| session_order(a, b));

        let mut items = Vec::new();
        for session in sessions {
            // 2) departments taking part in the session
            for sd in snapshot
                .session_departments
                .iter()
                .filter(|sd| sd.session_id == session.session_id)
            {
                let Some(department) = snapshot.department(&sd.department_id) else {
                    warn!(
                        session_id = %session.session_id,
                        department_id = %sd.department_id,
                        "session_department references unknown department"
                    );
                    continue;
                };
                items.push(self.build_item(exam_id, session, department, snapshot));
            }
        }
        items
    }

    // 3) per pair: qualifying courses -> unique students, allocated halls
    fn build_item(
        &self,
        exam_id: &str,
        session: &ExamSession,
        department: &Department,
        snapshot: &EntitySnapshot,
    ) -> WorkItem {
        let course_ids: HashSet<&str> = snapshot
            .session_courses
            .iter()
            .filter(|sc| sc.session_id == session.session_id)
            .filter_map(|sc| snapshot.course(&sc.course_id))
            .filter(|c| c.department_id == department.department_id)
            .map(|c| c.course_id.as_str())
            .collect();

        // set semantics: a student in several qualifying courses counts once
        let mut seen: HashSet<&str> = HashSet::new();
        let mut students = Vec::new();
        for reg in snapshot
            .registrations
            .iter()
            .filter(|r| r.exam_id == exam_id && course_ids.contains(r.course_id.as_str()))
        {
            if !seen.insert(reg.student_id.as_str()) {
                continue;
            }
            match snapshot.student(&reg.student_id) {
                Some(student) => students.push(student.clone()),
                None => warn!(student_id = %reg.student_id, "registration references unknown student"),
            }
        }

        let halls: Vec<Hall> = snapshot
            .session_halls
            .iter()
            .filter(|sh| {
                sh.session_id == session.session_id && sh.department_id == department.department_id
            })
            .filter_map(|sh| snapshot.hall(&sh.hall_id).cloned())
            .collect();

        WorkItem {
            session: session.clone(),
            department: department.clone(),
            students,
            halls,
        }
    }
}

/// Chronological session order: start time, sequence number, id
pub fn session_order(a: &ExamSession, b: &ExamSession) -> Ordering {
    a.starts_at
        .cmp(&b.starts_at)
        .then(a.sequence_no.cmp(&b.sequence_no))
        .then(a.session_id.cmp(&b.session_id))
}

/// Halls of a session allocated to departments other than `department_id`
pub fn occupied_halls(session_id: &str, department_id: &str, snapshot: &EntitySnapshot) -> Vec<String> {
    let mut ids: Vec<String> = snapshot
        .session_halls
        .iter()
        .filter(|sh| sh.session_id == session_id && sh.department_id != department_id)
        .map(|sh| sh.hall_id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
