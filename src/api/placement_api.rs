// ==========================================
// Exam Center - Placement API
// ==========================================
// Responsibility:
// 1. work item list of an exam (capacity status per pair)
// 2. open / save / discard the placement of a (session, department) pair
// 3. batch placement of every placeable pair of an exam
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{require_id, ApiError, ApiResult};
use crate::domain::exam::Exam;
use crate::domain::snapshot::EntitySnapshot;
use crate::domain::types::{CapacityStatus, DistributionStatus, PlacementState};
use crate::engine::assignment_resolver::{AssignmentResolver, WorkItem};
use crate::engine::id_gen::IdGenerator;
use crate::engine::placement::{PlacementError, PlacementSession};
use crate::engine::shuffle::RandomSource;
use crate::i18n;
use crate::repository::{AssignmentRepository, SnapshotRepository};

// ==========================================
// DTOs
// ==========================================

/// One row of the placement worklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemSummary {
    pub session_id: String,
    pub starts_at: NaiveDateTime,
    pub department_id: String,
    pub department_code: String,
    pub student_count: usize,
    pub hall_count: usize,
    pub total_capacity: u64,
    pub capacity_status: CapacityStatus,
    pub capacity_message: String,
    pub can_place: bool,
    pub placed_count: usize, // persisted assignment rows
    /// Saved rows no longer seat exactly the eligible students
    pub placement_stale: bool,
}

impl WorkItemSummary {
    fn from_item(item: &WorkItem, placed_count: usize, placement_stale: bool) -> Self {
        let capacity_status = item.capacity_status();
        Self {
            session_id: item.session.session_id.clone(),
            starts_at: item.session.starts_at,
            department_id: item.department.department_id.clone(),
            department_code: item.department.code.clone(),
            student_count: item.unique_count(),
            hall_count: item.halls.len(),
            total_capacity: item.total_capacity(),
            capacity_status,
            capacity_message: i18n::capacity_message(&capacity_status, !item.halls.is_empty()),
            can_place: item.can_place(),
            placed_count,
            placement_stale,
        }
    }
}

/// Per-hall line of the distribution editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallTargetView {
    pub hall_id: String,
    pub hall_name: String,
    pub capacity: u32,
    pub target: u32,
    pub placed: usize,
}

/// Editor state of an open placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionView {
    pub state: PlacementState,
    pub stale_rows: usize,
    pub student_count: usize,
    pub halls: Vec<HallTargetView>,
    pub status: DistributionStatus,
    pub status_message: String,
    pub can_place: bool,
}

impl DistributionView {
    pub fn of(session: &PlacementSession) -> Self {
        let item = session.work_item();
        let halls = item
            .halls
            .iter()
            .map(|hall| HallTargetView {
                hall_id: hall.hall_id.clone(),
                hall_name: hall.name.clone(),
                capacity: hall.capacity,
                target: session.distribution().target_of(&hall.hall_id).unwrap_or(0),
                placed: session
                    .placement()
                    .and_then(|p| p.students_in(&hall.hall_id))
                    .map(|s| s.len())
                    .unwrap_or(0),
            })
            .collect();
        let status = session.distribution_status();

        Self {
            state: session.state(),
            stale_rows: session.stale_rows(),
            student_count: item.unique_count(),
            halls,
            status,
            status_message: i18n::distribution_message(&status),
            can_place: session.can_place(),
        }
    }
}

/// Result of a batch placement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoPlaceReport {
    pub placed_pairs: usize,
    pub seated_students: usize,
    pub already_placed: Vec<(String, String)>,
    /// Pairs whose saved rows were out of date (re-placed or skipped)
    pub stale: Vec<(String, String)>,
    pub skipped: Vec<(String, String, String)>, // (session, department, reason)
    pub message: String,
}

// ==========================================
// PlacementApi
// ==========================================
pub struct PlacementApi {
    snapshot_repo: Arc<SnapshotRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    resolver: AssignmentResolver,
}

impl PlacementApi {
    pub fn new(
        snapshot_repo: Arc<SnapshotRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            snapshot_repo,
            assignment_repo,
            resolver: AssignmentResolver::new(),
        }
    }

    /// Placement worklist of an exam (pairs with at least one student)
    pub fn list_work_items(&self, exam_id: &str) -> ApiResult<Vec<WorkItemSummary>> {
        require_id("exam_id", exam_id)?;
        let snapshot = self.snapshot_repo.load()?;
        active_exam(&snapshot, exam_id)?;

        Ok(self
            .resolver
            .resolve(exam_id, &snapshot)
            .iter()
            .map(|item| {
                let rows = snapshot.assignments_for(item.session_id(), item.department_id());
                let stale = PlacementSession::open(item.clone(), &rows).is_stale();
                WorkItemSummary::from_item(item, rows.len(), stale)
            })
            .collect())
    }

    /// Open the placement workflow of a pair
    pub fn open_placement(&self, session_id: &str, department_id: &str) -> ApiResult<PlacementSession> {
        require_id("session_id", session_id)?;
        require_id("department_id", department_id)?;
        let snapshot = self.snapshot_repo.load()?;
        self.open_from_snapshot(session_id, department_id, &snapshot)
    }

    /// Persist a PLACED session (replaces the pair's previous rows)
    pub fn save_placement(
        &self,
        session: PlacementSession,
        ids: &mut dyn IdGenerator,
    ) -> ApiResult<usize> {
        if session.state() != PlacementState::Placed {
            return Err(PlacementError::NotPlaced.into());
        }
        let written = session.save(ids, self.assignment_repo.as_ref())?;
        Ok(written)
    }

    /// Delete the saved placement of a pair
    pub fn discard_placement(&self, session_id: &str, department_id: &str) -> ApiResult<usize> {
        require_id("session_id", session_id)?;
        require_id("department_id", department_id)?;
        let removed = self.assignment_repo.delete_for_pair(session_id, department_id)?;
        info!(session_id, department_id, removed, "placement discarded");
        Ok(removed)
    }

    /// Place and save every pair of an exam that has no up-to-date saved
    /// placement, using the default distribution
    #[instrument(skip(self, source, ids))]
    pub fn auto_place_exam(
        &self,
        exam_id: &str,
        source: &mut dyn RandomSource,
        ids: &mut dyn IdGenerator,
    ) -> ApiResult<AutoPlaceReport> {
        require_id("exam_id", exam_id)?;
        let snapshot = self.snapshot_repo.load()?;
        active_exam(&snapshot, exam_id)?;

        let mut report = AutoPlaceReport::default();
        for item in self.resolver.resolve(exam_id, &snapshot) {
            let key = (item.session_id().to_string(), item.department_id().to_string());
            let existing = snapshot.assignments_for(&key.0, &key.1);

            let mut session = PlacementSession::open(item, &existing);
            if session.state() == PlacementState::Placed {
                report.already_placed.push(key);
                continue;
            }
            if session.is_stale() {
                report.stale.push(key.clone());
            }

            if let Err(e) = session.place(source) {
                warn!(session_id = %key.0, department_id = %key.1, "skipped: {}", e);
                report.skipped.push((key.0, key.1, e.to_string()));
                continue;
            }

            let written = session.save(ids, self.assignment_repo.as_ref())?;
            report.placed_pairs += 1;
            report.seated_students += written;
        }

        report.message = i18n::placement_saved_message(report.seated_students);
        info!(
            placed_pairs = report.placed_pairs,
            stale = report.stale.len(),
            seated = report.seated_students,
            skipped = report.skipped.len(),
            "exam placement finished"
        );
        Ok(report)
    }

    fn open_from_snapshot(
        &self,
        session_id: &str,
        department_id: &str,
        snapshot: &EntitySnapshot,
    ) -> ApiResult<PlacementSession> {
        let session = snapshot
            .session(session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session(id={})", session_id)))?;
        active_exam(snapshot, &session.exam_id)?;

        let item = self
            .resolver
            .resolve_pair(session_id, department_id, snapshot)
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "SessionDepartment(session={}, department={})",
                    session_id, department_id
                ))
            })?;

        let existing = snapshot.assignments_for(session_id, department_id);
        Ok(PlacementSession::open(item, &existing))
    }
}

/// Exam lookup that rejects unknown and inactive exams
pub(crate) fn active_exam<'a>(snapshot: &'a EntitySnapshot, exam_id: &str) -> ApiResult<&'a Exam> {
    let exam = snapshot
        .exam(exam_id)
        .ok_or_else(|| ApiError::NotFound(format!("Exam(id={})", exam_id)))?;
    if !exam.is_active {
        return Err(ApiError::ExamInactive(exam_id.to_string()));
    }
    Ok(exam)
}
