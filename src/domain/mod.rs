// ==========================================
// Exam Center - Domain layer
// ==========================================
// Responsibility: entity records and value types
// No data access, no engine logic
// ==========================================

pub mod assignment;
pub mod campus;
pub mod enrollment;
pub mod exam;
pub mod snapshot;
pub mod types;

pub use assignment::{SessionHall, StudentHallAssignment};
pub use campus::{Building, Course, Department, Hall, School};
pub use enrollment::{Student, StudentCourseRegistration};
pub use exam::{Exam, ExamSession, SessionCourse, SessionDepartment};
pub use snapshot::EntitySnapshot;
pub use types::{CapacityStatus, DistributionStatus, HallExclusivity, PlacementState};
