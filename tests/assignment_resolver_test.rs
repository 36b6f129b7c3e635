// ==========================================
// AssignmentResolver integration tests
// ==========================================
// Work items derived from a seeded SQLite database
// ==========================================


use exam_center::domain::types::CapacityStatus;
use exam_center::domain::{Course, HallExclusivity, SessionCourse, StudentCourseRegistration};
use exam_center::engine::AssignmentResolver;
use exam_center::repository::{
    CampusRepository, ExamRepository, SessionHallRepository, SnapshotRepository, StudentRepository,
};
use test_helpers::*;

fn load(db_path: &str) -> exam_center::EntitySnapshot {
    let conn = open_test_connection(db_path).expect("open db");
    SnapshotRepository::from_connection(conn)
        .load()
        .expect("load snapshot")
}

#[test]
fn test_resolve_seeded_exam() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let items = AssignmentResolver::new().resolve(EXAM, &load(&db_path));

    assert_eq!(items.len(), 2);

    let eco = items.iter().find(|i| i.department_id() == DEPT).expect("D1 item");
    assert_eq!(eco.unique_count(), 50);
    assert_eq!(eco.total_capacity(), 50);
    assert_eq!(eco.capacity_status(), CapacityStatus::Sufficient { spare: 0 });
    assert!(eco.can_place());

    let mat = items.iter().find(|i| i.department_id() == OTHER_DEPT).expect("D2 item");
    assert_eq!(mat.unique_count(), 10);
    assert!(mat.halls.is_empty());
    assert!(!mat.can_place());
}

#[test]
fn test_student_in_two_courses_counts_once() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let conn = open_test_connection(&db_path).expect("open db");

    CampusRepository::from_connection(conn.clone())
        .insert_course(&Course {
            course_id: "C3".to_string(),
            department_id: DEPT.to_string(),
            code: "ECO102".to_string(),
            name: "ECO102".to_string(),
            teacher_id: None,
        })
        .expect("insert course");
    ExamRepository::from_connection(conn.clone())
        .add_session_course(&SessionCourse {
            id: "SC-3".to_string(),
            session_id: SESSION.to_string(),
            course_id: "C3".to_string(),
        })
        .expect("add session course");
    let students = StudentRepository::from_connection(conn);
    for n in 1..=5 {
        students
            .register(&StudentCourseRegistration {
                id: format!("R-C3-{}", n),
                exam_id: EXAM.to_string(),
                course_id: "C3".to_string(),
                student_id: student(n).student_id,
            })
            .expect("register");
    }

    let snapshot = load(&db_path);
    let item = AssignmentResolver::new()
        .resolve_pair(SESSION, DEPT, &snapshot)
        .expect("pair");
    assert_eq!(item.unique_count(), 50);
}

#[test]
fn test_inactive_exam_resolves_empty() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let snapshot = load(&db_path);
    let resolver = AssignmentResolver::new();

    assert!(resolver.resolve(INACTIVE_EXAM, &snapshot).is_empty());
    assert!(resolver.resolve("missing", &snapshot).is_empty());
}

#[test]
fn test_hall_plan_marks_occupied_halls() {
    let (_tmp, db_path) = create_seeded_db().expect("seed db");
    let conn = open_test_connection(&db_path).expect("open db");
    SessionHallRepository::from_connection(conn)
        .add(&session_hall("SH3", SESSION, OTHER_DEPT, HALL_C), HallExclusivity::Reject)
        .expect("add hall");

    let rows = AssignmentResolver::new().hall_plan(EXAM, &load(&db_path));
    assert_eq!(rows.len(), 2);

    let eco = rows.iter().find(|r| r.item.department_id() == DEPT).expect("D1 row");
    assert_eq!(eco.occupied_hall_ids, vec![HALL_C.to_string()]);

    let mat = rows.iter().find(|r| r.item.department_id() == OTHER_DEPT).expect("D2 row");
    assert_eq!(mat.occupied_hall_ids, vec![HALL_A.to_string(), HALL_B.to_string()]);
    assert_eq!(
        mat.item.capacity_status(),
        CapacityStatus::Sufficient { spare: 15 }
    );
}
