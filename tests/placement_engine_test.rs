// ==========================================
// PlacementSession integration tests
// ==========================================
// Distribution, placement and reconstruction over a seeded database
// ==========================================


use std::collections::HashSet;

use exam_center::domain::types::{DistributionStatus, PlacementState};
use exam_center::engine::{
    seeded_source, AssignmentResolver, PlacementError, PlacementSession, SequentialIdGenerator,
};
use exam_center::repository::{AssignmentRepository, CampusRepository, SnapshotRepository};
use test_helpers::*;

fn open_session(db_path: &str) -> PlacementSession {
    let conn = open_test_connection(db_path).expect("open db");
    let snapshot = SnapshotRepository::from_connection(conn)
        .load()
        .expect("load snapshot");
    let item = AssignmentResolver::new()
        .resolve_pair(SESSION, DEPT, &snapshot)
        .expect("pair");
    let existing = snapshot.assignments_for(SESSION, DEPT);
    PlacementSession::open(item, &existing)
}

#[test]
fn test_default_distribution_is_proportional() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let session = open_session(&db_path);

    assert_eq!(session.state(), PlacementState::Distributed);
    assert_eq!(session.distribution().target_of(HALL_A), Some(30));
    assert_eq!(session.distribution().target_of(HALL_B), Some(20));
    assert_eq!(session.distribution_status(), DistributionStatus::Valid);
    assert!(session.can_place());
}

#[test]
fn test_place_seats_every_student_once() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let mut session = open_session(&db_path);

    let placement = session.place(&mut seeded_source(7)).expect("place");
    assert_eq!(placement.students_in(HALL_A).map(|s| s.len()), Some(30));
    assert_eq!(placement.students_in(HALL_B).map(|s| s.len()), Some(20));

    let ids: HashSet<String> = placement
        .halls
        .iter()
        .flat_map(|h| h.students.iter().map(|s| s.student_id.clone()))
        .collect();
    assert_eq!(ids.len(), 50);
    assert_eq!(session.state(), PlacementState::Placed);
}

#[test]
fn test_edited_targets_gate_placement() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let mut session = open_session(&db_path);

    session.set_target(HALL_A, 29).expect("edit");
    assert_eq!(
        session.distribution_status(),
        DistributionStatus::Shortfall { missing: 1 }
    );
    assert!(!session.can_place());
    assert!(matches!(
        session.place(&mut seeded_source(1)),
        Err(PlacementError::InvalidDistribution { .. })
    ));

    session.set_target(HALL_A, 31).expect("edit");
    assert_eq!(
        session.distribution_status(),
        DistributionStatus::Surplus { extra: 1 }
    );
    assert!(!session.can_place());

    session.set_target(HALL_A, 25).expect("edit");
    session.set_target(HALL_B, 25).expect("edit");
    assert!(session.can_place());
    let placement = session.place(&mut seeded_source(1)).expect("place");
    assert_eq!(placement.students_in(HALL_B).map(|s| s.len()), Some(25));
}

#[test]
fn test_targets_locked_until_reset() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let mut session = open_session(&db_path);
    session.set_target(HALL_A, 40).expect("edit");
    session.set_target(HALL_B, 10).expect("edit");
    session.place(&mut seeded_source(3)).expect("place");

    assert_eq!(session.set_target(HALL_A, 30), Err(PlacementError::TargetsLocked));

    session.reset().expect("reset");
    assert_eq!(session.state(), PlacementState::Distributed);
    assert_eq!(session.distribution().target_of(HALL_A), Some(30));
    assert_eq!(session.reset(), Err(PlacementError::NotPlaced));
}

#[test]
fn test_insufficient_capacity_blocks_placement() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let conn = open_test_connection(&db_path).expect("open db");
    CampusRepository::from_connection(conn)
        .update_hall_capacity(HALL_B, 0)
        .expect("shrink hall");

    let mut session = open_session(&db_path);
    assert!(!session.work_item().capacity_status().is_sufficient());
    assert_eq!(
        session.place(&mut seeded_source(1)).err(),
        Some(PlacementError::CapacityInsufficient { shortfall: 20 })
    );
}

#[test]
fn test_saved_placement_reopens_as_placed() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let mut session = open_session(&db_path);
    let placed = session.place(&mut seeded_source(11)).expect("place").clone();

    let conn = open_test_connection(&db_path).expect("open db");
    let repo = AssignmentRepository::from_connection(conn);
    let written = session
        .save(&mut SequentialIdGenerator::new("A"), &repo)
        .expect("save");
    assert_eq!(written, 50);

    let reopened = open_session(&db_path);
    assert_eq!(reopened.state(), PlacementState::Placed);
    assert_eq!(reopened.distribution().target_of(HALL_A), Some(30));
    assert_eq!(reopened.distribution().target_of(HALL_B), Some(20));

    let hall_set = |p: &exam_center::Placement, hall: &str| -> HashSet<String> {
        p.students_in(hall)
            .unwrap_or_default()
            .iter()
            .map(|s| s.student_id.clone())
            .collect()
    };
    let reloaded = reopened.placement().expect("placement");
    assert_eq!(hall_set(&placed, HALL_A), hall_set(reloaded, HALL_A));
    assert_eq!(hall_set(&placed, HALL_B), hall_set(reloaded, HALL_B));
}

#[test]
fn test_ten_students_split_evenly() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let conn = open_test_connection(&db_path).expect("open db");
    let campus = CampusRepository::from_connection(conn.clone());
    campus.insert_hall(&hall("H-D", "D-104", 10)).expect("hall");
    campus.insert_hall(&hall("H-E", "E-105", 10)).expect("hall");
    let session_halls = exam_center::repository::SessionHallRepository::from_connection(conn);
    for (id, hall_id) in [("SH-D", "H-D"), ("SH-E", "H-E")] {
        session_halls
            .add(
                &session_hall(id, SESSION, OTHER_DEPT, hall_id),
                exam_center::HallExclusivity::Reject,
            )
            .expect("add hall");
    }

    let snapshot = SnapshotRepository::from_connection(open_test_connection(&db_path).expect("db"))
        .load()
        .expect("load");
    let item = AssignmentResolver::new()
        .resolve_pair(SESSION, OTHER_DEPT, &snapshot)
        .expect("pair");
    let mut session = PlacementSession::open(item, &[]);

    assert_eq!(session.distribution().target_of("H-D"), Some(5));
    assert_eq!(session.distribution().target_of("H-E"), Some(5));
    let placement = session.place(&mut seeded_source(5)).expect("place");
    assert_eq!(placement.seated_count(), 10);
}
