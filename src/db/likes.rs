//! Like edge repository.
//!
//! Like edges live in `user_film_likes`, keyed by (film_id, user_id).
//! The primary key is the uniqueness constraint; a duplicate insert
//! surfaces as the typed `AlreadyLiked` condition, so two like calls
//! can never leave two edges.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::store::LikeStore;

pub struct LikeRepository {
    pool: SqlitePool,
}

impl LikeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, film_id: i64, user_id: i64) -> Result<()> {
        let inserted = sqlx::query(
            "INSERT INTO user_film_likes (film_id, user_id) VALUES (?, ?)",
        )
        .bind(film_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(()),
            Err(err) if Error::is_unique_violation(&err) => {
                Err(Error::AlreadyLiked { film_id, user_id })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn remove(&self, film_id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM user_film_likes WHERE film_id = ? AND user_id = ?",
        )
        .bind(film_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::LikeNotFound { film_id, user_id });
        }
        Ok(())
    }

    pub async fn users_for_film(&self, film_id: i64) -> Result<HashSet<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM user_film_likes WHERE film_id = ?",
        )
        .bind(film_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    /// Film ids by descending liker count; ties break on ascending
    /// film id. Films nobody likes never appear.
    pub async fn top_films(&self, limit: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT film_id
             FROM user_film_likes
             GROUP BY film_id
             ORDER BY COUNT(user_id) DESC, film_id ASC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl LikeStore for LikeRepository {
    async fn add(&self, film_id: i64, user_id: i64) -> Result<()> {
        LikeRepository::add(self, film_id, user_id).await
    }

    async fn remove(&self, film_id: i64, user_id: i64) -> Result<()> {
        LikeRepository::remove(self, film_id, user_id).await
    }

    async fn users_for_film(&self, film_id: i64) -> Result<HashSet<i64>> {
        LikeRepository::users_for_film(self, film_id).await
    }

    async fn top_films(&self, limit: i64) -> Result<Vec<i64>> {
        LikeRepository::top_films(self, limit).await
    }
}
