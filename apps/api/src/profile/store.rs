//! Profile store: resolves a request id to the merged user/student profile document.
//!
//! An id may name either a user account or a student record; each may link to the
//! other. When both are found the student's keys override the user's.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when neither a user nor a student has this id.
    async fn find_profile(&self, id: Uuid) -> Result<Option<Value>, AppError>;
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub student_id: Option<Uuid>,
    pub profile: Value,
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub profile: Value,
}

/// PostgreSQL-backed store. Profiles are JSONB documents in `users` and `students`.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user(&self, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>("SELECT id, student_id, profile FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn student(&self, id: Uuid) -> Result<Option<StudentRow>, sqlx::Error> {
        sqlx::query_as::<_, StudentRow>(
            "SELECT id, user_id, profile FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Value>, AppError> {
        let (user, student) = match self.user(id).await? {
            Some(user) => {
                let student = match user.student_id {
                    Some(student_id) => self.student(student_id).await?,
                    None => None,
                };
                (Some(user), student)
            }
            None => {
                debug!("No user {id}; trying students");
                let student = self.student(id).await?;
                let user = match student.as_ref().and_then(|s| s.user_id) {
                    Some(user_id) => self.user(user_id).await?,
                    None => None,
                };
                (user, student)
            }
        };

        if user.is_none() && student.is_none() {
            return Ok(None);
        }

        info!(
            "Resolved profile {id}: user={}, student={}",
            user.is_some(),
            student.is_some()
        );
        Ok(Some(merge_profiles(user, student)))
    }
}

/// Shallow merge of the two profile documents; student keys win. Each row's id is
/// written as `_id` before merging, so the student id wins there too.
pub fn merge_profiles(user: Option<UserRow>, student: Option<StudentRow>) -> Value {
    let mut merged = Map::new();

    if let Some(user) = user {
        merged.extend(with_id(user.profile, user.id));
    }
    if let Some(student) = student {
        merged.extend(with_id(student.profile, student.id));
    }

    Value::Object(merged)
}

fn with_id(profile: Value, id: Uuid) -> Map<String, Value> {
    let mut fields = match profile {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    fields.insert("_id".to_string(), Value::String(id.to_string()));
    fields
}
