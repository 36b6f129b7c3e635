// ==========================================
// Exam Center - Seat distribution
// ==========================================
// Distribution: hall -> target student count, before placement
// Default: capacity-proportional floor, rounding slack on the last hall
// ==========================================

use crate::domain::campus::{total_capacity, Hall};
use crate::domain::types::DistributionStatus;
use serde::{Deserialize, Serialize};

/// Target count of one hall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallTarget {
    pub hall_id: String,
    pub target: u32,
}

// ==========================================
// Distribution
// ==========================================
// Entries keep the halls' given order; the partition step relies on it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    entries: Vec<HallTarget>,
}

impl Distribution {
    /// Capacity-proportional default
    ///
    /// Every hall but the last gets floor(capacity / total_capacity * student_count);
    /// the last hall takes what is left so the targets sum to `student_count`.
    /// Zero total capacity (or no halls) gives an empty distribution.
    pub fn proportional(halls: &[Hall], student_count: usize) -> Self {
        let total = total_capacity(halls);
        if total == 0 {
            return Self::default();
        }

        let count = student_count as u64;
        let mut running: u64 = 0;
        let mut entries = Vec::with_capacity(halls.len());
        let last = halls.len() - 1;

        for (idx, hall) in halls.iter().enumerate() {
            let target = if idx == last {
                count.saturating_sub(running)
            } else {
                // integer form of floor(capacity / total * count)
                u64::from(hall.capacity) * count / total
            };
            running += target;
            entries.push(HallTarget {
                hall_id: hall.hall_id.clone(),
                target: target as u32,
            });
        }

        Self { entries }
    }

    /// Build from explicit (hall, target) pairs
    pub fn from_targets(entries: Vec<HallTarget>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HallTarget] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn target_of(&self, hall_id: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.hall_id == hall_id)
            .map(|e| e.target)
    }

    /// Overwrite one hall's target; false when the hall is not part of the distribution
    pub fn set_target(&mut self, hall_id: &str, target: u32) -> bool {
        match self.entries.iter_mut().find(|e| e.hall_id == hall_id) {
            Some(entry) => {
                entry.target = target;
                true
            }
            None => false,
        }
    }

    /// Sum of all targets
    pub fn assigned(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.target)).sum()
    }

    /// Exact-sum check against the student count
    pub fn status(&self, student_count: usize) -> DistributionStatus {
        DistributionStatus::evaluate(self.assigned(), student_count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halls(capacities: &[u32]) -> Vec<Hall> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, cap)| Hall {
                hall_id: format!("H{}", i + 1),
                building_id: "B1".to_string(),
                name: format!("Hall {}", i + 1),
                capacity: *cap,
                floor: "0".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_exact_proportional_split() {
        let dist = Distribution::proportional(&halls(&[30, 20]), 50);
        assert_eq!(dist.target_of("H1"), Some(30));
        assert_eq!(dist.target_of("H2"), Some(20));
        assert!(dist.status(50).is_valid());
    }

    #[test]
    fn test_rounding_slack_goes_to_last_hall() {
        // 10 students over 3 equal halls: 3, 3, 4
        let dist = Distribution::proportional(&halls(&[25, 25, 25]), 10);
        let targets: Vec<u32> = dist.entries().iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![3, 3, 4]);
    }

    #[test]
    fn test_sum_always_matches_student_count() {
        let layouts: Vec<Vec<u32>> = vec![
            vec![1],
            vec![7, 0, 13],
            vec![0, 0, 5],
            vec![33, 17, 41, 9],
            vec![100, 1, 1],
            vec![3, 3, 3, 3, 3, 3, 3],
        ];
        for layout in layouts {
            for count in [0usize, 1, 2, 19, 50, 97, 250] {
                let dist = Distribution::proportional(&halls(&layout), count);
                assert_eq!(
                    dist.assigned(),
                    count as u64,
                    "layout={:?} count={}",
                    layout,
                    count
                );
            }
        }
    }

    #[test]
    fn test_zero_capacity_gives_empty_distribution() {
        let dist = Distribution::proportional(&halls(&[0, 0]), 12);
        assert!(dist.is_empty());
        assert_eq!(
            dist.status(12),
            DistributionStatus::Shortfall { missing: 12 }
        );
    }

    #[test]
    fn test_manual_edit_surplus() {
        let mut dist = Distribution::proportional(&halls(&[30, 20]), 50);
        assert!(dist.set_target("H1", 25));
        assert!(dist.set_target("H2", 26));
        assert!(!dist.set_target("H9", 1));
        assert_eq!(dist.status(50), DistributionStatus::Surplus { extra: 1 });
    }
}
