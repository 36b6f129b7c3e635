// ==========================================
// Exam Center - Application layer
// ==========================================
// Responsibility: wire repositories and APIs for the CLI
// ==========================================

pub mod state;

pub use crate::db::default_db_path as get_default_db_path;
pub use state::AppState;
