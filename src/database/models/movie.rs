use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

/// A production in the agency catalogue. `release_date` stays free-form
/// text so planned and tentative dates round-trip untouched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_date: Option<String>,
}

impl Movie {
    /// All movies, oldest row first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Movie>, DatabaseError> {
        let movies =
            sqlx::query_as::<_, Movie>("SELECT id, title, release_date FROM movies ORDER BY id")
                .fetch_all(pool)
                .await?;

        Ok(movies)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Movie>, DatabaseError> {
        let movie =
            sqlx::query_as::<_, Movie>("SELECT id, title, release_date FROM movies WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(movie)
    }

    pub async fn insert(
        pool: &PgPool,
        title: &str,
        release_date: Option<&str>,
    ) -> Result<Movie, DatabaseError> {
        let movie = sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (title, release_date) VALUES ($1, $2) \
             RETURNING id, title, release_date",
        )
        .bind(title)
        .bind(release_date)
        .fetch_one(pool)
        .await?;

        Ok(movie)
    }

    /// Persist the current field values of this row.
    pub async fn update(&self, pool: &PgPool) -> Result<Movie, DatabaseError> {
        let movie = sqlx::query_as::<_, Movie>(
            "UPDATE movies SET title = $1, release_date = $2 WHERE id = $3 \
             RETURNING id, title, release_date",
        )
        .bind(&self.title)
        .bind(self.release_date.as_deref())
        .bind(self.id)
        .fetch_one(pool)
        .await?;

        Ok(movie)
    }

    /// Delete by id; returns false when no row matched.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
