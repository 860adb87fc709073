use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

/// A cast member on the agency roster.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl Actor {
    /// All actors, oldest row first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Actor>, DatabaseError> {
        let actors =
            sqlx::query_as::<_, Actor>("SELECT id, name, age, gender FROM actors ORDER BY id")
                .fetch_all(pool)
                .await?;

        Ok(actors)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Actor>, DatabaseError> {
        let actor =
            sqlx::query_as::<_, Actor>("SELECT id, name, age, gender FROM actors WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(actor)
    }

    pub async fn insert(
        pool: &PgPool,
        name: &str,
        age: Option<i32>,
        gender: Option<&str>,
    ) -> Result<Actor, DatabaseError> {
        let actor = sqlx::query_as::<_, Actor>(
            "INSERT INTO actors (name, age, gender) VALUES ($1, $2, $3) \
             RETURNING id, name, age, gender",
        )
        .bind(name)
        .bind(age)
        .bind(gender)
        .fetch_one(pool)
        .await?;

        Ok(actor)
    }

    /// Persist the current field values of this row.
    pub async fn update(&self, pool: &PgPool) -> Result<Actor, DatabaseError> {
        let actor = sqlx::query_as::<_, Actor>(
            "UPDATE actors SET name = $1, age = $2, gender = $3 WHERE id = $4 \
             RETURNING id, name, age, gender",
        )
        .bind(&self.name)
        .bind(self.age)
        .bind(self.gender.as_deref())
        .bind(self.id)
        .fetch_one(pool)
        .await?;

        Ok(actor)
    }

    /// Delete by id; returns false when no row matched.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
