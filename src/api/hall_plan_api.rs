// ==========================================
// Exam Center - Hall plan API
// ==========================================
// Responsibility: assign halls to (session, department) pairs ahead of
// placement; the exclusivity policy comes from config_kv
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{require_id, ApiError, ApiResult};
use crate::api::placement_api::active_exam;
use crate::config::ConfigManager;
use crate::domain::assignment::SessionHall;
use crate::domain::campus::Hall;
use crate::domain::types::CapacityStatus;
use crate::engine::assignment_resolver::{occupied_halls, AssignmentResolver, HallPlanRow};
use crate::engine::id_gen::IdGenerator;
use crate::i18n;
use crate::repository::{SessionHallRepository, SnapshotRepository};

/// Capacity planning line of a pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallPlanLine {
    pub session_id: String,
    pub department_id: String,
    pub department_code: String,
    pub student_count: usize,
    pub hall_ids: Vec<String>,
    pub total_capacity: u64,
    pub capacity_status: CapacityStatus,
    pub capacity_message: String,
    pub occupied_hall_ids: Vec<String>,
}

impl From<&HallPlanRow> for HallPlanLine {
    fn from(row: &HallPlanRow) -> Self {
        let item = &row.item;
        let capacity_status = item.capacity_status();
        Self {
            session_id: item.session.session_id.clone(),
            department_id: item.department.department_id.clone(),
            department_code: item.department.code.clone(),
            student_count: item.unique_count(),
            hall_ids: item.halls.iter().map(|h| h.hall_id.clone()).collect(),
            total_capacity: item.total_capacity(),
            capacity_status,
            capacity_message: i18n::capacity_message(&capacity_status, !item.halls.is_empty()),
            occupied_hall_ids: row.occupied_hall_ids.clone(),
        }
    }
}

pub struct HallPlanApi {
    snapshot_repo: Arc<SnapshotRepository>,
    session_hall_repo: Arc<SessionHallRepository>,
    config_manager: Arc<ConfigManager>,
    resolver: AssignmentResolver,
}

impl HallPlanApi {
    pub fn new(
        snapshot_repo: Arc<SnapshotRepository>,
        session_hall_repo: Arc<SessionHallRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            snapshot_repo,
            session_hall_repo,
            config_manager,
            resolver: AssignmentResolver::new(),
        }
    }

    /// Every (session, department) pair of an exam, including pairs
    /// without students
    pub fn list_hall_plan(&self, exam_id: &str) -> ApiResult<Vec<HallPlanLine>> {
        require_id("exam_id", exam_id)?;
        let snapshot = self.snapshot_repo.load()?;
        active_exam(&snapshot, exam_id)?;

        Ok(self
            .resolver
            .hall_plan(exam_id, &snapshot)
            .iter()
            .map(HallPlanLine::from)
            .collect())
    }

    /// Halls still free for a pair: not yet assigned to it and not held
    /// by another department of the session
    pub fn list_free_halls(&self, session_id: &str, department_id: &str) -> ApiResult<Vec<Hall>> {
        require_id("session_id", session_id)?;
        require_id("department_id", department_id)?;
        let snapshot = self.snapshot_repo.load()?;

        let occupied = occupied_halls(session_id, department_id, &snapshot);
        let own: Vec<&str> = snapshot
            .session_halls
            .iter()
            .filter(|sh| sh.session_id == session_id && sh.department_id == department_id)
            .map(|sh| sh.hall_id.as_str())
            .collect();

        let mut halls: Vec<Hall> = snapshot
            .halls
            .iter()
            .filter(|h| !occupied.contains(&h.hall_id) && !own.contains(&h.hall_id.as_str()))
            .cloned()
            .collect();
        halls.sort_by(|a, b| a.building_id.cmp(&b.building_id).then_with(|| a.name.cmp(&b.name)));
        Ok(halls)
    }

    /// Assign a hall to a pair
    ///
    /// # Returns
    /// - Ok(SessionHall): the stored row (the existing one when the pair
    ///   already holds the hall)
    /// - Err(ApiError::HallOccupied): another department of the session
    ///   holds the hall and the policy is REJECT
    #[instrument(skip(self, ids))]
    pub fn add_session_hall(
        &self,
        session_id: &str,
        department_id: &str,
        hall_id: &str,
        ids: &mut dyn IdGenerator,
    ) -> ApiResult<SessionHall> {
        require_id("session_id", session_id)?;
        require_id("department_id", department_id)?;
        require_id("hall_id", hall_id)?;

        let snapshot = self.snapshot_repo.load()?;
        let session = snapshot
            .session(session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session(id={})", session_id)))?;
        active_exam(&snapshot, &session.exam_id)?;
        if snapshot.hall(hall_id).is_none() {
            return Err(ApiError::NotFound(format!("Hall(id={})", hall_id)));
        }
        let in_session = snapshot
            .session_departments
            .iter()
            .any(|sd| sd.session_id == session_id && sd.department_id == department_id);
        if !in_session {
            return Err(ApiError::NotFound(format!(
                "SessionDepartment(session={}, department={})",
                session_id, department_id
            )));
        }

        let policy = self
            .config_manager
            .get_hall_exclusivity()
            .map_err(|e| ApiError::InternalError(format!("config read failed: {}", e)))?;

        let row = SessionHall {
            id: ids.next_id(),
            session_id: session_id.to_string(),
            department_id: department_id.to_string(),
            hall_id: hall_id.to_string(),
        };
        let stored = self.session_hall_repo.add(&row, policy)?;
        info!(id = %stored.id, %policy, "session hall stored");
        Ok(stored)
    }

    /// Remove a hall allocation by its id
    pub fn remove_session_hall(&self, session_hall_id: &str) -> ApiResult<()> {
        require_id("session_hall_id", session_hall_id)?;
        self.session_hall_repo.remove(session_hall_id)?;
        Ok(())
    }
}
