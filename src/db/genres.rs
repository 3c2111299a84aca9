//! Genre reference-data repository. Read-only; rows come from seeds.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Genre;
use crate::store::GenreStore;

pub struct GenreRepository {
    pool: SqlitePool,
}

impl GenreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Genre>> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM genres WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| Genre { id, name }))
    }

    pub async fn list(&self) -> Result<Vec<Genre>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM genres ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id, name)| Genre { id, name }).collect())
    }
}

#[async_trait]
impl GenreStore for GenreRepository {
    async fn get(&self, id: i64) -> Result<Option<Genre>> {
        GenreRepository::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<Genre>> {
        GenreRepository::list(self).await
    }
}
