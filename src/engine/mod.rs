// ==========================================
// Exam Center - Engine layer
// ==========================================
// Responsibility: placement rules over entity snapshots
// Engines never touch SQL; persistence goes through AssignmentStore
// ==========================================

pub mod assignment_resolver;
pub mod distribution;
pub mod id_gen;
pub mod placement;
pub mod roster;
pub mod shuffle;

pub use assignment_resolver::{AssignmentResolver, HallPlanRow, WorkItem};
pub use distribution::{Distribution, HallTarget};
pub use id_gen::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use placement::{
    AssignmentStore, HallPlacement, Placement, PlacementError, PlacementResult, PlacementSession,
};
pub use roster::{HallRoster, RosterBuilder, RosterEntry};
pub use shuffle::{fisher_yates, seeded_source, thread_source, RandomSource, RngSource};
