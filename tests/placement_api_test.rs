// ==========================================
// PlacementApi integration tests
// ==========================================
// Worklist, save / replace / discard, batch placement
// ==========================================


use exam_center::api::{ApiError, DistributionView};
use exam_center::app::AppState;
use exam_center::domain::types::PlacementState;
use exam_center::engine::{seeded_source, PlacementError, SequentialIdGenerator};
use exam_center::domain::StudentCourseRegistration;
use exam_center::repository::{AssignmentRepository, StudentRepository};
use test_helpers::*;

fn seeded_state() -> (tempfile::NamedTempFile, AppState) {
    let (tmp, db_path) = create_seeded_db().expect("seed db");
    let state = AppState::new(db_path).expect("app state");
    (tmp, state)
}

fn saved_rows(db_path: &str) -> usize {
    let conn = open_test_connection(db_path).expect("open db");
    AssignmentRepository::from_connection(conn)
        .find_by_pair(SESSION, DEPT)
        .expect("rows")
        .len()
}

#[test]
fn test_list_work_items() {
    let (_tmp, state) = seeded_state();
    let items = state.placement_api.list_work_items(EXAM).expect("worklist");

    assert_eq!(items.len(), 2);
    let eco = items.iter().find(|i| i.department_id == DEPT).expect("D1");
    assert_eq!(eco.student_count, 50);
    assert_eq!(eco.hall_count, 2);
    assert!(eco.can_place);
    assert_eq!(eco.placed_count, 0);

    let mat = items.iter().find(|i| i.department_id == OTHER_DEPT).expect("D2");
    assert!(!mat.can_place);
}

#[test]
fn test_inactive_and_unknown_exam() {
    let (_tmp, state) = seeded_state();
    assert!(matches!(
        state.placement_api.list_work_items(INACTIVE_EXAM),
        Err(ApiError::ExamInactive(_))
    ));
    assert!(matches!(
        state.placement_api.list_work_items("missing"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.placement_api.list_work_items(" "),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_open_unknown_pair() {
    let (_tmp, state) = seeded_state();
    assert!(matches!(
        state.placement_api.open_placement(SESSION, "D9"),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_save_replace_and_reopen() {
    let (_tmp, state) = seeded_state();
    let api = &state.placement_api;

    let mut session = api.open_placement(SESSION, DEPT).expect("open");
    session.place(&mut seeded_source(1)).expect("place");
    let written = api
        .save_placement(session, &mut SequentialIdGenerator::new("first"))
        .expect("save");
    assert_eq!(written, 50);
    assert_eq!(saved_rows(&state.db_path), 50);

    // reopen, reset, place with a new split and save again: rows are replaced
    let mut session = api.open_placement(SESSION, DEPT).expect("reopen");
    assert_eq!(session.state(), PlacementState::Placed);
    session.reset().expect("reset");
    session.set_target(HALL_A, 26).expect("edit");
    session.set_target(HALL_B, 24).expect("edit");
    session.place(&mut seeded_source(2)).expect("place");
    api.save_placement(session, &mut SequentialIdGenerator::new("second"))
        .expect("save");
    assert_eq!(saved_rows(&state.db_path), 50);

    let view = DistributionView::of(&api.open_placement(SESSION, DEPT).expect("reopen"));
    assert_eq!(view.state, PlacementState::Placed);
    let b = view.halls.iter().find(|h| h.hall_id == HALL_B).expect("hall B");
    assert_eq!((b.target, b.placed), (24, 24));

    let items = api.list_work_items(EXAM).expect("worklist");
    let eco = items.iter().find(|i| i.department_id == DEPT).expect("D1");
    assert_eq!(eco.placed_count, 50);
}

#[test]
fn test_save_without_placement_is_rejected() {
    let (_tmp, state) = seeded_state();
    let session = state
        .placement_api
        .open_placement(SESSION, DEPT)
        .expect("open");
    let result = state
        .placement_api
        .save_placement(session, &mut SequentialIdGenerator::new("x"));
    assert!(matches!(
        result,
        Err(ApiError::PlacementUnavailable(PlacementError::NotPlaced))
    ));
    assert_eq!(saved_rows(&state.db_path), 0);
}

#[test]
fn test_discard_placement() {
    let (_tmp, state) = seeded_state();
    let api = &state.placement_api;

    let mut session = api.open_placement(SESSION, DEPT).expect("open");
    session.place(&mut seeded_source(4)).expect("place");
    api.save_placement(session, &mut SequentialIdGenerator::new("a"))
        .expect("save");

    assert_eq!(api.discard_placement(SESSION, DEPT).expect("discard"), 50);
    assert_eq!(saved_rows(&state.db_path), 0);

    let session = api.open_placement(SESSION, DEPT).expect("reopen");
    assert_eq!(session.state(), PlacementState::Distributed);
}

#[test]
fn test_auto_place_exam() {
    let (_tmp, state) = seeded_state();
    let api = &state.placement_api;

    let report = api
        .auto_place_exam(EXAM, &mut seeded_source(9), &mut SequentialIdGenerator::new("auto"))
        .expect("auto place");
    assert_eq!(report.placed_pairs, 1);
    assert_eq!(report.seated_students, 50);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].1, OTHER_DEPT);
    assert!(report.stale.is_empty());
    assert!(report.message.contains("50"));

    // second run leaves the saved pair untouched
    let report = api
        .auto_place_exam(EXAM, &mut seeded_source(10), &mut SequentialIdGenerator::new("again"))
        .expect("auto place");
    assert_eq!(report.placed_pairs, 0);
    assert_eq!(report.already_placed, vec![(SESSION.to_string(), DEPT.to_string())]);
    assert_eq!(saved_rows(&state.db_path), 50);
}

fn pair() -> (String, String) {
    (SESSION.to_string(), DEPT.to_string())
}

#[test]
fn test_late_registration_invalidates_saved_placement() {
    let (_tmp, state) = seeded_state();
    let api = &state.placement_api;
    api.auto_place_exam(EXAM, &mut seeded_source(1), &mut SequentialIdGenerator::new("first"))
        .expect("auto place");
    assert_eq!(saved_rows(&state.db_path), 50);

    // ST051 registers for C1 after the placement was saved
    let conn = open_test_connection(&state.db_path).expect("open db");
    StudentRepository::from_connection(conn)
        .register(&StudentCourseRegistration {
            id: "R-C1-51".to_string(),
            exam_id: EXAM.to_string(),
            course_id: "C1".to_string(),
            student_id: student(51).student_id,
        })
        .expect("register");

    let session = api.open_placement(SESSION, DEPT).expect("reopen");
    assert_eq!(session.state(), PlacementState::Distributed);
    assert_eq!(session.stale_rows(), 50);
    assert!(!session.can_place());
    assert!(matches!(
        api.save_placement(session, &mut SequentialIdGenerator::new("x")),
        Err(ApiError::PlacementUnavailable(PlacementError::NotPlaced))
    ));
    assert_eq!(saved_rows(&state.db_path), 50);

    let items = api.list_work_items(EXAM).expect("worklist");
    let eco = items.iter().find(|i| i.department_id == DEPT).expect("D1");
    assert_eq!(eco.student_count, 51);
    assert!(eco.placement_stale);

    // a third hall makes room; the batch run re-places the stale pair
    state
        .hall_plan_api
        .add_session_hall(SESSION, DEPT, HALL_C, &mut SequentialIdGenerator::new("SH"))
        .expect("add hall");
    let report = api
        .auto_place_exam(EXAM, &mut seeded_source(2), &mut SequentialIdGenerator::new("second"))
        .expect("auto place");
    assert_eq!(report.stale, vec![pair()]);
    assert!(report.already_placed.is_empty());
    assert_eq!(report.seated_students, 51);
    assert_eq!(saved_rows(&state.db_path), 51);

    let session = api.open_placement(SESSION, DEPT).expect("reopen");
    assert_eq!(session.state(), PlacementState::Placed);
    assert!(!session.is_stale());
}

#[test]
fn test_removed_hall_invalidates_saved_placement() {
    let (_tmp, state) = seeded_state();
    let api = &state.placement_api;
    api.auto_place_exam(EXAM, &mut seeded_source(3), &mut SequentialIdGenerator::new("first"))
        .expect("auto place");

    // SH2 is the H-B allocation of the seeded pair
    state
        .hall_plan_api
        .remove_session_hall("SH2")
        .expect("remove hall");

    let session = api.open_placement(SESSION, DEPT).expect("reopen");
    assert_eq!(session.state(), PlacementState::Distributed);
    assert_eq!(session.stale_rows(), 50);
    let view = DistributionView::of(&session);
    assert_eq!(view.halls.len(), 1);
    assert_eq!((view.halls[0].target, view.halls[0].placed), (50, 0));

    // 30 seats for 50 students: reported, and the saved rows stay intact
    let report = api
        .auto_place_exam(EXAM, &mut seeded_source(4), &mut SequentialIdGenerator::new("second"))
        .expect("auto place");
    assert!(report.already_placed.is_empty());
    assert_eq!(report.stale, vec![pair()]);
    assert!(report.skipped.iter().any(|(_, dept, _)| dept == DEPT));
    assert_eq!(saved_rows(&state.db_path), 50);
}
