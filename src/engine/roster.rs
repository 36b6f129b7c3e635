// ==========================================
// Exam Center - Hall roster
// ==========================================
// Responsibility: seated students per (session, hall), the data behind
// printed hall lists and signature lists
// Input: EntitySnapshot (saved assignment rows)
// ==========================================

use crate::domain::campus::Hall;
use crate::domain::exam::ExamSession;
use crate::domain::snapshot::EntitySnapshot;
use crate::engine::assignment_resolver::session_order;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub seat_no: u32, // 1-based, after sorting
    pub student_no: i64,
    pub first_name: String,
    pub last_name: String,
    pub department_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallRoster {
    pub session: ExamSession,
    pub hall: Hall,
    pub building_name: String,
    pub entries: Vec<RosterEntry>,
}

impl HallRoster {
    pub fn seated(&self) -> usize {
        self.entries.len()
    }
}

pub struct RosterBuilder {
    // stateless
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// Rosters of an exam: sessions by date, halls by building then name
    ///
    /// Several departments sharing a hall end up in one roster.
    pub fn build(&self, exam_id: &str, snapshot: &EntitySnapshot) -> Vec<HallRoster> {
        let mut sessions: Vec<&ExamSession> = snapshot
            .sessions
            .iter()
            .filter(|s| s.exam_id == exam_id)
            .collect();
        sessions.sort_by(|a, b| session_order(a, b));

        let mut rosters = Vec::new();
        for session in sessions {
            let rows: Vec<_> = snapshot
                .assignments
                .iter()
                .filter(|a| a.session_id == session.session_id)
                .collect();

            let mut hall_ids: Vec<&str> = rows.iter().map(|r| r.hall_id.as_str()).collect();
            hall_ids.sort();
            hall_ids.dedup();

            let mut halls: Vec<&Hall> = hall_ids
                .into_iter()
                .filter_map(|id| snapshot.hall(id))
                .collect();
            halls.sort_by(|a, b| {
                a.building_id
                    .cmp(&b.building_id)
                    .then(a.name.cmp(&b.name))
            });

            for hall in halls {
                let mut entries: Vec<RosterEntry> = rows
                    .iter()
                    .filter(|r| r.hall_id == hall.hall_id)
                    .filter_map(|r| {
                        let Some(student) = snapshot.student(&r.student_id) else {
                            warn!(student_id = %r.student_id, "roster row references unknown student");
                            return None;
                        };
                        let department_code = snapshot
                            .department(&r.department_id)
                            .map(|d| d.code.clone())
                            .unwrap_or_default();
                        Some(RosterEntry {
                            seat_no: 0,
                            student_no: student.student_no,
                            first_name: student.first_name.clone(),
                            last_name: student.last_name.clone(),
                            department_code,
                        })
                    })
                    .collect();

                entries.sort_by(|a, b| {
                    a.last_name
                        .cmp(&b.last_name)
                        .then(a.first_name.cmp(&b.first_name))
                        .then(a.student_no.cmp(&b.student_no))
                });
                for (idx, entry) in entries.iter_mut().enumerate() {
                    entry.seat_no = idx as u32 + 1;
                }

                let building_name = snapshot
                    .building(&hall.building_id)
                    .map(|b| b.name.clone())
                    .unwrap_or_default();

                rosters.push(HallRoster {
                    session: session.clone(),
                    hall: hall.clone(),
                    building_name,
                    entries,
                });
            }
        }
        rosters
    }
}
