// ==========================================
// Exam Center - Placement engine
// ==========================================
// Responsibility: seat each eligible student of a work item in one hall
// Input: WorkItem + persisted assignment rows of the pair
// Output: StudentHallAssignment rows (one per seated student)
// ==========================================
// State machine:
//   open  -> PLACED (persisted rows seat exactly the eligible students)
//          | DISTRIBUTED (no rows, or stale rows; default distribution)
//   DISTRIBUTED --set_target--> DISTRIBUTED
//   DISTRIBUTED --place------> PLACED      (valid distribution + enough capacity)
//   PLACED      --reset------> DISTRIBUTED (default distribution restored)
//   PLACED      --save-------> done        (rows handed to the store)
// Guard failures return PlacementError and leave the state untouched
// ==========================================

use crate::domain::assignment::StudentHallAssignment;
use crate::domain::campus::Hall;
use crate::domain::enrollment::Student;
use crate::domain::types::{DistributionStatus, PlacementState};
use crate::engine::assignment_resolver::WorkItem;
use crate::engine::distribution::{Distribution, HallTarget};
use crate::engine::id_gen::IdGenerator;
use crate::engine::shuffle::{fisher_yates, RandomSource};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

// ==========================================
// PlacementError - disabled-action guards
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("targets are read-only after placement, reset first")]
    TargetsLocked,

    #[error("nothing placed yet")]
    NotPlaced,

    #[error("distribution does not match student count: {status}")]
    InvalidDistribution { status: DistributionStatus },

    #[error("not enough seats: shortfall={shortfall}")]
    CapacityInsufficient { shortfall: u64 },

    #[error("no hall assigned to session={session_id} department={department_id}")]
    NoHalls {
        session_id: String,
        department_id: String,
    },

    #[error("hall {0} is not assigned to this work item")]
    UnknownHall(String),
}

pub type PlacementResult<T> = Result<T, PlacementError>;

// ==========================================
// Trait: AssignmentStore - persistence collaborator
// ==========================================
// One call replaces the full assignment set of a (session, department) pair
pub trait AssignmentStore {
    type Error;

    fn replace_assignments(
        &self,
        session_id: &str,
        department_id: &str,
        rows: &[StudentHallAssignment],
    ) -> Result<usize, Self::Error>;
}

// ==========================================
// Placement result
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallPlacement {
    pub hall: Hall,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub halls: Vec<HallPlacement>,
}

impl Placement {
    pub fn seated_count(&self) -> usize {
        self.halls.iter().map(|h| h.students.len()).sum()
    }

    pub fn students_in(&self, hall_id: &str) -> Option<&[Student]> {
        self.halls
            .iter()
            .find(|h| h.hall.hall_id == hall_id)
            .map(|h| h.students.as_slice())
    }

    /// Flatten to one row per (hall, student), each with a fresh id
    pub fn to_rows(
        &self,
        session_id: &str,
        department_id: &str,
        ids: &mut dyn IdGenerator,
    ) -> Vec<StudentHallAssignment> {
        self.halls
            .iter()
            .flat_map(|hp| hp.students.iter().map(move |s| (hp, s)))
            .map(|(hp, student)| StudentHallAssignment {
                id: ids.next_id(),
                session_id: session_id.to_string(),
                department_id: department_id.to_string(),
                hall_id: hp.hall.hall_id.clone(),
                student_id: student.student_id.clone(),
            })
            .collect()
    }
}

// ==========================================
// PlacementSession - workflow of one work item
// ==========================================
#[derive(Debug, Clone)]
pub struct PlacementSession {
    item: WorkItem,
    distribution: Distribution,
    placement: Option<Placement>,
    stale_rows: usize, // persisted rows ignored because they no longer fit the work item
}

impl PlacementSession {
    /// Open the workflow of a work item
    ///
    /// Persisted rows of the pair are loaded as PLACED when they seat every
    /// eligible student exactly once in the pair's current halls. Otherwise
    /// (no rows, late registrations, removed halls, students no longer
    /// eligible) the default proportional distribution is computed and the
    /// session is DISTRIBUTED; stale rows stay in the store until the next save.
    #[instrument(skip(item, existing), fields(
        session_id = %item.session.session_id,
        department_id = %item.department.department_id,
        students = item.students.len(),
        halls = item.halls.len(),
        existing = existing.len()
    ))]
    pub fn open(item: WorkItem, existing: &[StudentHallAssignment]) -> Self {
        let rows: Vec<&StudentHallAssignment> = existing
            .iter()
            .filter(|a| a.belongs_to(item.session_id(), item.department_id()))
            .collect();

        if rows.is_empty() {
            return Self::distributed(item, 0);
        }

        match reconstruct(&item, &rows) {
            Some((distribution, placement)) => {
                debug!(seated = placement.seated_count(), "placement loaded from persisted rows");
                Self {
                    item,
                    distribution,
                    placement: Some(placement),
                    stale_rows: 0,
                }
            }
            None => {
                warn!(
                    rows = rows.len(),
                    eligible = item.unique_count(),
                    "saved placement is out of date, reopening with the default distribution"
                );
                let stale = rows.len();
                Self::distributed(item, stale)
            }
        }
    }

    fn distributed(item: WorkItem, stale_rows: usize) -> Self {
        let distribution = Distribution::proportional(&item.halls, item.unique_count());
        debug!(assigned = distribution.assigned(), "default distribution computed");
        Self {
            item,
            distribution,
            placement: None,
            stale_rows,
        }
    }

    /// Whether persisted rows existed but no longer match the work item
    pub fn is_stale(&self) -> bool {
        self.stale_rows > 0
    }

    pub fn stale_rows(&self) -> usize {
        self.stale_rows
    }

    pub fn state(&self) -> PlacementState {
        if self.placement.is_some() {
            PlacementState::Placed
        } else {
            PlacementState::Distributed
        }
    }

    pub fn work_item(&self) -> &WorkItem {
        &self.item
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn distribution_status(&self) -> DistributionStatus {
        self.distribution.status(self.item.unique_count())
    }

    /// Whether `place` would run right now
    pub fn can_place(&self) -> bool {
        self.check_placeable().is_ok()
    }

    /// Edit one hall's target (DISTRIBUTED only)
    pub fn set_target(&mut self, hall_id: &str, target: u32) -> PlacementResult<()> {
        if self.placement.is_some() {
            return Err(PlacementError::TargetsLocked);
        }
        if !self.distribution.set_target(hall_id, target) {
            return Err(PlacementError::UnknownHall(hall_id.to_string()));
        }
        Ok(())
    }

    /// Shuffle the students and cut them into per-hall slices
    #[instrument(skip(self, source), fields(
        session_id = %self.item.session.session_id,
        department_id = %self.item.department.department_id
    ))]
    pub fn place(&mut self, source: &mut dyn RandomSource) -> PlacementResult<&Placement> {
        self.check_placeable()?;

        let mut pool = self.item.students.clone();
        fisher_yates(&mut pool, source);

        let mut rest = pool.into_iter();
        let mut halls = Vec::with_capacity(self.distribution.entries().len());
        for entry in self.distribution.entries() {
            // entries were built from item.halls, lookup cannot miss
            let Some(hall) = self.item.halls.iter().find(|h| h.hall_id == entry.hall_id) else {
                continue;
            };
            let students: Vec<Student> = rest.by_ref().take(entry.target as usize).collect();
            halls.push(HallPlacement {
                hall: hall.clone(),
                students,
            });
        }

        let placement = Placement { halls };
        debug!(seated = placement.seated_count(), "students placed");
        Ok(&*self.placement.insert(placement))
    }

    /// Drop the placement and restore the default distribution (PLACED only)
    pub fn reset(&mut self) -> PlacementResult<()> {
        if self.placement.is_none() {
            return Err(PlacementError::NotPlaced);
        }
        self.placement = None;
        self.distribution = Distribution::proportional(&self.item.halls, self.item.unique_count());
        Ok(())
    }

    /// Rows that `save` would write (PLACED only)
    pub fn assignment_rows(&self, ids: &mut dyn IdGenerator) -> PlacementResult<Vec<StudentHallAssignment>> {
        let placement = self.placement.as_ref().ok_or(PlacementError::NotPlaced)?;
        Ok(placement.to_rows(self.item.session_id(), self.item.department_id(), ids))
    }

    /// Hand the placement to the store as one replacing write and end the workflow
    pub fn save<S>(self, ids: &mut dyn IdGenerator, store: &S) -> Result<usize, S::Error>
    where
        S: AssignmentStore,
        S::Error: From<PlacementError>,
    {
        let rows = self.assignment_rows(ids)?;
        let written =
            store.replace_assignments(self.item.session_id(), self.item.department_id(), &rows)?;

        info!(
            session_id = %self.item.session.session_id,
            department_id = %self.item.department.department_id,
            rows = written,
            "placement saved"
        );
        Ok(written)
    }

    fn check_placeable(&self) -> PlacementResult<()> {
        if self.placement.is_some() {
            return Err(PlacementError::TargetsLocked);
        }
        if self.item.halls.is_empty() {
            return Err(PlacementError::NoHalls {
                session_id: self.item.session_id().to_string(),
                department_id: self.item.department_id().to_string(),
            });
        }
        if let crate::domain::types::CapacityStatus::Insufficient { shortfall } =
            self.item.capacity_status()
        {
            return Err(PlacementError::CapacityInsufficient { shortfall });
        }
        let status = self.distribution_status();
        if !status.is_valid() {
            return Err(PlacementError::InvalidDistribution { status });
        }
        Ok(())
    }
}

// ==========================================
// Reconstruction from persisted rows
// ==========================================
// Only a complete placement is reconstructed: every row in a current hall,
// every row on an eligible student, every eligible student seated once.
// Per hall: target = slice length = row count.
fn reconstruct(item: &WorkItem, rows: &[&StudentHallAssignment]) -> Option<(Distribution, Placement)> {
    let students: HashMap<&str, &Student> = item
        .students
        .iter()
        .map(|s| (s.student_id.as_str(), s))
        .collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(rows.len());
    for row in rows {
        if !item.halls.iter().any(|h| h.hall_id == row.hall_id) {
            warn!(hall_id = %row.hall_id, "assignment row references a hall no longer allocated to the pair");
            return None;
        }
        if !students.contains_key(row.student_id.as_str()) {
            warn!(student_id = %row.student_id, "assigned student is no longer eligible");
            return None;
        }
        if !seen.insert(row.student_id.as_str()) {
            warn!(student_id = %row.student_id, "student seated twice");
            return None;
        }
    }

    let missing = students.len().saturating_sub(seen.len());
    if missing > 0 {
        warn!(missing, "eligible students without a seat");
        return None;
    }

    let mut targets = Vec::with_capacity(item.halls.len());
    let mut halls = Vec::with_capacity(item.halls.len());
    for hall in &item.halls {
        let seated: Vec<Student> = rows
            .iter()
            .filter(|r| r.hall_id == hall.hall_id)
            .filter_map(|r| students.get(r.student_id.as_str()).map(|s| (*s).clone()))
            .collect();

        targets.push(HallTarget {
            hall_id: hall.hall_id.clone(),
            target: seated.len() as u32,
        });
        halls.push(HallPlacement {
            hall: hall.clone(),
            students: seated,
        });
    }

    Some((Distribution::from_targets(targets), Placement { halls }))
}
