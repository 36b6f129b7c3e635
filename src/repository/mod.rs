// ==========================================
// Exam Center - Repository layer
// ==========================================
// Responsibility: data access over SQLite, hides SQL from the engines
// Rule: parameterized queries only, no placement logic
// ==========================================

pub mod assignment_repo;
pub mod campus_repo;
pub mod error;
pub mod exam_repo;
pub mod session_hall_repo;
pub mod snapshot_repo;
pub mod student_repo;

pub use assignment_repo::AssignmentRepository;
pub use campus_repo::CampusRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use exam_repo::ExamRepository;
pub use session_hall_repo::SessionHallRepository;
pub use snapshot_repo::SnapshotRepository;
pub use student_repo::StudentRepository;
