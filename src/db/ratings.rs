//! Rating reference-data repository. Read-only; rows come from seeds.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Rating;
use crate::store::RatingStore;

pub struct RatingRepository {
    pool: SqlitePool,
}

impl RatingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Rating>> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM ratings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| Rating { id, name }))
    }

    pub async fn list(&self) -> Result<Vec<Rating>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM ratings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id, name)| Rating { id, name }).collect())
    }
}

#[async_trait]
impl RatingStore for RatingRepository {
    async fn get(&self, id: i64) -> Result<Option<Rating>> {
        RatingRepository::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<Rating>> {
        RatingRepository::list(self).await
    }
}
