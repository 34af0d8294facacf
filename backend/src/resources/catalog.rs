//! Entity catalog
//!
//! One [`Resource`] implementation per administrative entity. The
//! implementations hold only the entity's columns and SQL; all handler
//! logic lives in the parent module.

use async_trait::async_trait;
use blackboard_shared::types::{
    BlogPayload, CoursePayload, EmployeePayload, EventPayload, SchoolPayload, StudentPayload,
    TeacherPayload,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::Resource;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub views: i32,
    pub comments: i32,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for Blog {
    const NAME: &'static str = "blog";
    const TITLE: &'static str = "Blog";
    type Payload = BlogPayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, title, author, date, views, comments, created_at \
             FROM blogs ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: BlogPayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO blogs (title, author, date, views, comments) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, author, date, views, comments, created_at",
        )
        .bind(payload.title)
        .bind(payload.author)
        .bind(payload.date)
        .bind(payload.views)
        .bind(payload.comments)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, payload: BlogPayload) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE blogs SET title = $2, author = $3, date = $4, views = $5, comments = $6 \
             WHERE id = $1 \
             RETURNING id, title, author, date, views, comments, created_at",
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.author)
        .bind(payload.date)
        .bind(payload.views)
        .bind(payload.comments)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub course_name: String,
    pub instructor: String,
    pub duration: i32,
    pub enrollment_count: i32,
    pub price: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for Course {
    const NAME: &'static str = "course";
    const TITLE: &'static str = "Course";
    type Payload = CoursePayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, course_name, instructor, duration, enrollment_count, price, created_at \
             FROM courses ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: CoursePayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO courses (course_name, instructor, duration, enrollment_count, price) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, course_name, instructor, duration, enrollment_count, price, created_at",
        )
        .bind(payload.course_name)
        .bind(payload.instructor)
        .bind(payload.duration)
        .bind(payload.enrollment_count)
        .bind(payload.price)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, payload: CoursePayload) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE courses SET course_name = $2, instructor = $3, duration = $4, \
             enrollment_count = $5, price = $6 \
             WHERE id = $1 \
             RETURNING id, course_name, instructor, duration, enrollment_count, price, created_at",
        )
        .bind(id)
        .bind(payload.course_name)
        .bind(payload.instructor)
        .bind(payload.duration)
        .bind(payload.enrollment_count)
        .bind(payload.price)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub department: String,
    pub join_date: NaiveDate,
    pub salary: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for Employee {
    const NAME: &'static str = "employee";
    const TITLE: &'static str = "Employee";
    type Payload = EmployeePayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, name, \"position\", department, join_date, salary, created_at \
             FROM employees ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: EmployeePayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO employees (name, \"position\", department, join_date, salary) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, \"position\", department, join_date, salary, created_at",
        )
        .bind(payload.name)
        .bind(payload.position)
        .bind(payload.department)
        .bind(payload.join_date)
        .bind(payload.salary)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        payload: EmployeePayload,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE employees SET name = $2, \"position\" = $3, department = $4, \
             join_date = $5, salary = $6 \
             WHERE id = $1 \
             RETURNING id, name, \"position\", department, join_date, salary, created_at",
        )
        .bind(id)
        .bind(payload.name)
        .bind(payload.position)
        .bind(payload.department)
        .bind(payload.join_date)
        .bind(payload.salary)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "start")]
    pub start_at: DateTime<Utc>,
    #[serde(rename = "end")]
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for Event {
    const NAME: &'static str = "event";
    const TITLE: &'static str = "Event";
    type Payload = EventPayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, title, start_at, end_at, created_at FROM events ORDER BY start_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: EventPayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO events (title, start_at, end_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, title, start_at, end_at, created_at",
        )
        .bind(payload.title)
        .bind(payload.start)
        .bind(payload.end)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, payload: EventPayload) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE events SET title = $2, start_at = $3, end_at = $4 \
             WHERE id = $1 \
             RETURNING id, title, start_at, end_at, created_at",
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.start)
        .bind(payload.end)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub students: i32,
    pub teachers: i32,
    pub founded_year: i32,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for School {
    const NAME: &'static str = "school";
    const TITLE: &'static str = "School";
    type Payload = SchoolPayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, name, location, students, teachers, founded_year, created_at \
             FROM schools ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: SchoolPayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO schools (name, location, students, teachers, founded_year) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, location, students, teachers, founded_year, created_at",
        )
        .bind(payload.name)
        .bind(payload.location)
        .bind(payload.students)
        .bind(payload.teachers)
        .bind(payload.founded_year)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, payload: SchoolPayload) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE schools SET name = $2, location = $3, students = $4, teachers = $5, \
             founded_year = $6 \
             WHERE id = $1 \
             RETURNING id, name, location, students, teachers, founded_year, created_at",
        )
        .bind(id)
        .bind(payload.name)
        .bind(payload.location)
        .bind(payload.students)
        .bind(payload.teachers)
        .bind(payload.founded_year)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub class_name: String,
    pub admission_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for Student {
    const NAME: &'static str = "student";
    const TITLE: &'static str = "Student";
    type Payload = StudentPayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, name, age, class_name, admission_date, created_at \
             FROM students ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: StudentPayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO students (name, age, class_name, admission_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, age, class_name, admission_date, created_at",
        )
        .bind(payload.name)
        .bind(payload.age)
        .bind(payload.class_name)
        .bind(payload.admission_date)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        payload: StudentPayload,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE students SET name = $2, age = $3, class_name = $4, admission_date = $5 \
             WHERE id = $1 \
             RETURNING id, name, age, class_name, admission_date, created_at",
        )
        .bind(id)
        .bind(payload.name)
        .bind(payload.age)
        .bind(payload.class_name)
        .bind(payload.admission_date)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub qualification: String,
    pub experience: i32,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Resource for Teacher {
    const NAME: &'static str = "teacher";
    const TITLE: &'static str = "Teacher";
    type Payload = TeacherPayload;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, name, subject, qualification, experience, contact_info, created_at \
             FROM teachers ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }

    async fn insert(pool: &PgPool, payload: TeacherPayload) -> sqlx::Result<Self> {
        sqlx::query_as(
            "INSERT INTO teachers (name, subject, qualification, experience, contact_info) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, subject, qualification, experience, contact_info, created_at",
        )
        .bind(payload.name)
        .bind(payload.subject)
        .bind(payload.qualification)
        .bind(payload.experience)
        .bind(payload.contact_info)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        payload: TeacherPayload,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "UPDATE teachers SET name = $2, subject = $3, qualification = $4, experience = $5, \
             contact_info = $6 \
             WHERE id = $1 \
             RETURNING id, name, subject, qualification, experience, contact_info, created_at",
        )
        .bind(id)
        .bind(payload.name)
        .bind(payload.subject)
        .bind(payload.qualification)
        .bind(payload.experience)
        .bind(payload.contact_info)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
