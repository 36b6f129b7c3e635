// ==========================================
// Exam Center - Core library
// ==========================================
// Hall planning and randomized student placement for exam sessions
// Stack: Rust + SQLite
// ==========================================

// Message catalog (locales/*.yml)
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - placement rules
pub mod engine;

// Configuration layer
pub mod config;

// Database infrastructure (connection setup, schema)
pub mod db;

// Logging
pub mod logging;

// Localized messages
pub mod i18n;

// API layer - use cases
pub mod api;

// Application layer - wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::types::{CapacityStatus, DistributionStatus, HallExclusivity, PlacementState};

pub use domain::{
    Building, Course, Department, EntitySnapshot, Exam, ExamSession, Hall, School, SessionHall,
    Student, StudentHallAssignment,
};

pub use engine::{
    AssignmentResolver, Distribution, Placement, PlacementError, PlacementSession,
    RosterBuilder, WorkItem,
};

pub use api::{HallPlanApi, PlacementApi, ReportApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Exam Center";
