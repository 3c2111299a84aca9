//! Film database repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::film_rows::{collapse, FilmRow};
use crate::error::Result;
use crate::models::Film;
use crate::store::FilmStore;

/// Joined select producing one [`FilmRow`] per (film, genre) pair, or a
/// single row with null genre columns for films without genres.
const SELECT_FILM_ROWS: &str = "
    SELECT f.id AS film_id, f.name, f.description, f.release_date, f.duration,
           r.id AS rating_id, r.name AS rating_name,
           g.id AS genre_id, g.name AS genre_name
    FROM films f
    LEFT JOIN ratings r ON f.rating_id = r.id
    LEFT JOIN film_genres fg ON f.id = fg.film_id
    LEFT JOIN genres g ON fg.genre_id = g.id
";

pub struct FilmRepository {
    pool: SqlitePool,
}

impl FilmRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the film and its ordered genre links in one transaction.
    pub async fn create(&self, mut film: Film) -> Result<Film> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO films (name, description, release_date, duration, rating_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.rating.as_ref().map(|r| r.id))
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        for (position, genre) in film.genres.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO film_genres (film_id, genre_id, sort_order)
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(genre.id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        film.id = id;
        Ok(film)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Film>> {
        let query = format!("{SELECT_FILM_ROWS} WHERE f.id = ? ORDER BY fg.sort_order");
        let rows = sqlx::query_as::<_, FilmRow>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(collapse(rows).into_iter().next())
    }

    pub async fn list(&self) -> Result<Vec<Film>> {
        let query = format!("{SELECT_FILM_ROWS} ORDER BY f.id, fg.sort_order");
        let rows = sqlx::query_as::<_, FilmRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(collapse(rows))
    }

    /// Fetch films preserving the order of the requested ids.
    pub async fn get_many(&self, ids: &[i64]) -> Result<Vec<Film>> {
        let mut films = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(film) = self.get(*id).await? {
                films.push(film);
            }
        }
        Ok(films)
    }

    /// Replace every mutable field, genre links included.
    pub async fn update(&self, film: &Film) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE films
             SET name = ?, description = ?, release_date = ?, duration = ?, rating_id = ?
             WHERE id = ?",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.rating.as_ref().map(|r| r.id))
        .bind(film.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM film_genres WHERE film_id = ?")
            .bind(film.id)
            .execute(&mut *tx)
            .await?;

        for (position, genre) in film.genres.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO film_genres (film_id, genre_id, sort_order)
                 VALUES (?, ?, ?)",
            )
            .bind(film.id)
            .bind(genre.id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete the film, its genre links and its like edges atomically.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_film_likes WHERE film_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM film_genres WHERE film_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM films WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FilmStore for FilmRepository {
    async fn create(&self, film: Film) -> Result<Film> {
        FilmRepository::create(self, film).await
    }

    async fn get(&self, id: i64) -> Result<Option<Film>> {
        FilmRepository::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<Film>> {
        FilmRepository::list(self).await
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Film>> {
        FilmRepository::get_many(self, ids).await
    }

    async fn update(&self, film: &Film) -> Result<()> {
        FilmRepository::update(self, film).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        FilmRepository::delete(self, id).await
    }
}
