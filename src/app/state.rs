// ==========================================
// Exam Center - Application state
// ==========================================
// Responsibility: shared connection, repositories and API instances
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{HallPlanApi, PlacementApi, ReportApi};
use crate::config::ConfigManager;
use crate::db::{initialize_schema, open_sqlite_connection};
use crate::i18n;
use crate::repository::{
    AssignmentRepository, CampusRepository, ExamRepository, SessionHallRepository,
    SnapshotRepository, StudentRepository,
};

/// Application state
///
/// Every repository shares one SQLite connection.
pub struct AppState {
    pub db_path: String,

    pub config_manager: Arc<ConfigManager>,

    /// Master data writers (schools, halls, courses)
    pub campus_repo: Arc<CampusRepository>,
    pub student_repo: Arc<StudentRepository>,
    pub exam_repo: Arc<ExamRepository>,

    pub placement_api: Arc<PlacementApi>,
    pub hall_plan_api: Arc<HallPlanApi>,
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// Open (and if needed create) the database at `db_path`
    ///
    /// # Returns
    /// - Ok(AppState)
    /// - Err(String): connection, schema or config failure
    ///
    /// The configured locale is applied to the message catalog.
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("initializing AppState, database: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database: {}", e))?;
        initialize_schema(&conn).map_err(|e| format!("schema initialization failed: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("cannot create ConfigManager: {}", e))?,
        );
        let locale = config_manager
            .get_locale()
            .map_err(|e| format!("cannot read locale: {}", e))?;
        i18n::set_locale(&locale);

        let snapshot_repo = Arc::new(SnapshotRepository::from_connection(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(conn.clone()));
        let session_hall_repo = Arc::new(SessionHallRepository::from_connection(conn.clone()));

        let placement_api = Arc::new(PlacementApi::new(snapshot_repo.clone(), assignment_repo));
        let hall_plan_api = Arc::new(HallPlanApi::new(
            snapshot_repo.clone(),
            session_hall_repo,
            config_manager.clone(),
        ));
        let report_api = Arc::new(ReportApi::new(snapshot_repo));

        tracing::info!(locale = %locale, "AppState ready");

        Ok(Self {
            db_path,
            config_manager,
            campus_repo: Arc::new(CampusRepository::from_connection(conn.clone())),
            student_repo: Arc::new(StudentRepository::from_connection(conn.clone())),
            exam_repo: Arc::new(ExamRepository::from_connection(conn)),
            placement_api,
            hall_plan_api,
            report_api,
        })
    }
}
