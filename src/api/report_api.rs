// ==========================================
// Exam Center - Report API
// ==========================================
// Responsibility: hall rosters of saved placements, CSV export for
// printed hall lists and signature lists
// ==========================================

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::api::error::{require_id, ApiError, ApiResult};
use crate::api::placement_api::active_exam;
use crate::engine::roster::{HallRoster, RosterBuilder};
use crate::repository::SnapshotRepository;

/// CSV layout of an exported roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSheet {
    /// Plain seating list
    HallList,
    /// Seating list with an empty signature column
    SignatureList,
}

#[derive(Debug, Serialize)]
struct RosterCsvRow<'a> {
    starts_at: String,
    building: &'a str,
    hall: &'a str,
    floor: &'a str,
    seat_no: u32,
    student_no: i64,
    last_name: &'a str,
    first_name: &'a str,
    department: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<&'a str>,
}

pub struct ReportApi {
    snapshot_repo: Arc<SnapshotRepository>,
    builder: RosterBuilder,
}

impl ReportApi {
    pub fn new(snapshot_repo: Arc<SnapshotRepository>) -> Self {
        Self {
            snapshot_repo,
            builder: RosterBuilder::new(),
        }
    }

    /// Rosters of every occupied (session, hall) of an exam
    pub fn hall_rosters(&self, exam_id: &str) -> ApiResult<Vec<HallRoster>> {
        require_id("exam_id", exam_id)?;
        let snapshot = self.snapshot_repo.load()?;
        active_exam(&snapshot, exam_id)?;
        Ok(self.builder.build(exam_id, &snapshot))
    }

    /// Write the rosters of an exam as CSV
    ///
    /// # Returns
    /// - Ok(usize): student lines written (header excluded)
    pub fn export_rosters_csv<W: Write>(
        &self,
        exam_id: &str,
        sheet: RosterSheet,
        writer: W,
    ) -> ApiResult<usize> {
        let rosters = self.hall_rosters(exam_id)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut written = 0;
        for roster in &rosters {
            let starts_at = roster.session.starts_at.format("%Y-%m-%d %H:%M").to_string();
            for entry in &roster.entries {
                csv_writer
                    .serialize(RosterCsvRow {
                        starts_at: starts_at.clone(),
                        building: &roster.building_name,
                        hall: &roster.hall.name,
                        floor: &roster.hall.floor,
                        seat_no: entry.seat_no,
                        student_no: entry.student_no,
                        last_name: &entry.last_name,
                        first_name: &entry.first_name,
                        department: &entry.department_code,
                        signature: match sheet {
                            RosterSheet::HallList => None,
                            RosterSheet::SignatureList => Some(""),
                        },
                    })
                    .map_err(|e| ApiError::InternalError(format!("csv write failed: {}", e)))?;
                written += 1;
            }
        }
        csv_writer
            .flush()
            .map_err(|e| ApiError::InternalError(format!("csv flush failed: {}", e)))?;

        info!(exam_id, halls = rosters.len(), rows = written, "rosters exported");
        Ok(written)
    }
}
