// ==========================================
// Exam Center - API layer
// ==========================================
// Responsibility: use-case entry points for the CLI and embedding apps
// ==========================================

pub mod error;
pub mod hall_plan_api;
pub mod placement_api;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use hall_plan_api::{HallPlanApi, HallPlanLine};
pub use placement_api::{
    AutoPlaceReport, DistributionView, HallTargetView, PlacementApi, WorkItemSummary,
};
pub use report_api::{ReportApi, RosterSheet};
