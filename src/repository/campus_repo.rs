// ==========================================
// Exam Center - Campus repository
// ==========================================
// Tables: school, department, building, hall, course
// No business logic here
// ==========================================

use crate::domain::campus::{Building, Course, Department, Hall, School};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct CampusRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CampusRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== school =====

    pub fn insert_school(&self, school: &School) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO school (school_id, name) VALUES (?1, ?2)",
            params![school.school_id, school.name],
        )?;
        Ok(())
    }

    pub fn list_schools(&self) -> RepositoryResult<Vec<School>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT school_id, name FROM school ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(School {
                    school_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<School>>>()?;
        Ok(rows)
    }

    // ===== department =====

    pub fn insert_department(&self, department: &Department) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO department (department_id, school_id, name, code) VALUES (?1, ?2, ?3, ?4)",
            params![
                department.department_id,
                department.school_id,
                department.name,
                department.code
            ],
        )?;
        Ok(())
    }

    pub fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT department_id, school_id, name, code FROM department ORDER BY code",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Department {
                    department_id: row.get(0)?,
                    school_id: row.get(1)?,
                    name: row.get(2)?,
                    code: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<Department>>>()?;
        Ok(rows)
    }

    // ===== building / hall =====

    pub fn insert_building(&self, building: &Building) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO building (building_id, name) VALUES (?1, ?2)",
            params![building.building_id, building.name],
        )?;
        Ok(())
    }

    pub fn list_buildings(&self) -> RepositoryResult<Vec<Building>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT building_id, name FROM building ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Building {
                    building_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<Building>>>()?;
        Ok(rows)
    }

    pub fn insert_hall(&self, hall: &Hall) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO hall (hall_id, building_id, name, capacity, floor)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![hall.hall_id, hall.building_id, hall.name, hall.capacity, hall.floor],
        )?;
        Ok(())
    }

    /// Change a hall's seat count
    pub fn update_hall_capacity(&self, hall_id: &str, capacity: u32) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE hall SET capacity = ?1 WHERE hall_id = ?2",
            params![capacity, hall_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Hall".to_string(),
                id: hall_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_hall(&self, hall_id: &str) -> RepositoryResult<Option<Hall>> {
        let conn = self.get_conn()?;
        let hall = conn
            .query_row(
                "SELECT hall_id, building_id, name, capacity, floor FROM hall WHERE hall_id = ?1",
                params![hall_id],
                map_hall,
            )
            .optional()?;
        Ok(hall)
    }

    pub fn list_halls(&self) -> RepositoryResult<Vec<Hall>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT hall_id, building_id, name, capacity, floor FROM hall ORDER BY building_id, name",
        )?;
        let rows = stmt
            .query_map([], map_hall)?
            .collect::<SqliteResult<Vec<Hall>>>()?;
        Ok(rows)
    }

    // ===== course =====

    pub fn insert_course(&self, course: &Course) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO course (course_id, department_id, code, name, teacher_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                course.course_id,
                course.department_id,
                course.code,
                course.name,
                course.teacher_id
            ],
        )?;
        Ok(())
    }

    pub fn list_courses(&self) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT course_id, department_id, code, name, teacher_id FROM course ORDER BY code",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Course {
                    course_id: row.get(0)?,
                    department_id: row.get(1)?,
                    code: row.get(2)?,
                    name: row.get(3)?,
                    teacher_id: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<Course>>>()?;
        Ok(rows)
    }
}

fn map_hall(row: &Row<'_>) -> SqliteResult<Hall> {
    Ok(Hall {
        hall_id: row.get(0)?,
        building_id: row.get(1)?,
        name: row.get(2)?,
        capacity: row.get(3)?,
        floor: row.get(4)?,
    })
}
