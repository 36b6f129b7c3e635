// ==========================================
// Exam Center - Domain value types
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Capacity status of a work item
// ==========================================
// Sufficient: sum(hall capacity) >= unique student count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityStatus {
    Sufficient { spare: u64 },
    Insufficient { shortfall: u64 },
}

impl CapacityStatus {
    pub fn evaluate(total_capacity: u64, student_count: u64) -> Self {
        if total_capacity >= student_count {
            CapacityStatus::Sufficient {
                spare: total_capacity - student_count,
            }
        } else {
            CapacityStatus::Insufficient {
                shortfall: student_count - total_capacity,
            }
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self, CapacityStatus::Sufficient { .. })
    }
}

// ==========================================
// Distribution status
// ==========================================
// Valid only when sum(targets) == student count exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStatus {
    Valid,
    Shortfall { missing: u64 },
    Surplus { extra: u64 },
}

impl DistributionStatus {
    pub fn evaluate(assigned: u64, student_count: u64) -> Self {
        use std::cmp::Ordering;
        match assigned.cmp(&student_count) {
            Ordering::Equal => DistributionStatus::Valid,
            Ordering::Less => DistributionStatus::Shortfall {
                missing: student_count - assigned,
            },
            Ordering::Greater => DistributionStatus::Surplus {
                extra: assigned - student_count,
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, DistributionStatus::Valid)
    }
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionStatus::Valid => write!(f, "VALID"),
            DistributionStatus::Shortfall { missing } => write!(f, "SHORTFALL({})", missing),
            DistributionStatus::Surplus { extra } => write!(f, "SURPLUS({})", extra),
        }
    }
}

// ==========================================
// Placement workflow state
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementState {
    Distributed, // editable per-hall targets, nothing placed
    Placed,      // students placed, targets read-only
}

impl fmt::Display for PlacementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementState::Distributed => write!(f, "DISTRIBUTED"),
            PlacementState::Placed => write!(f, "PLACED"),
        }
    }
}

// ==========================================
// Hall exclusivity policy (session_hall writes)
// ==========================================
// Reject: a hall serves one department per session
// Allow: conflicting rows are accepted and only reported as occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HallExclusivity {
    Reject,
    Allow,
}

impl fmt::Display for HallExclusivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HallExclusivity::Reject => write!(f, "REJECT"),
            HallExclusivity::Allow => write!(f, "ALLOW"),
        }
    }
}

impl std::str::FromStr for HallExclusivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REJECT" => Ok(HallExclusivity::Reject),
            "ALLOW" => Ok(HallExclusivity::Allow),
            other => Err(format!("unknown hall exclusivity policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_status() {
        assert_eq!(
            CapacityStatus::evaluate(50, 50),
            CapacityStatus::Sufficient { spare: 0 }
        );
        assert_eq!(
            CapacityStatus::evaluate(20, 50),
            CapacityStatus::Insufficient { shortfall: 30 }
        );
    }

    #[test]
    fn test_distribution_status() {
        assert!(DistributionStatus::evaluate(50, 50).is_valid());
        assert_eq!(
            DistributionStatus::evaluate(51, 50),
            DistributionStatus::Surplus { extra: 1 }
        );
        assert_eq!(
            DistributionStatus::evaluate(0, 7),
            DistributionStatus::Shortfall { missing: 7 }
        );
    }

    #[test]
    fn test_hall_exclusivity_parse() {
        assert_eq!("reject".parse::<HallExclusivity>(), Ok(HallExclusivity::Reject));
        assert_eq!(" ALLOW ".parse::<HallExclusivity>(), Ok(HallExclusivity::Allow));
        assert!("maybe".parse::<HallExclusivity>().is_err());
    }
}
