//! Reference-data seeds.
//!
//! Genres and ratings are read-only reference rows; they are inserted
//! with `INSERT OR IGNORE` so re-runs are idempotent and existing rows
//! are preserved. The in-memory backend loads the same tables.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;

pub const REFERENCE_GENRES: &[(i64, &str)] = &[
    (1, "Comedy"),
    (2, "Drama"),
    (3, "Animation"),
    (4, "Thriller"),
    (5, "Documentary"),
    (6, "Action"),
];

pub const REFERENCE_RATINGS: &[(i64, &str)] = &[
    (1, "G"),
    (2, "PG"),
    (3, "PG-13"),
    (4, "R"),
    (5, "NC-17"),
];

pub async fn run_seeds(pool: &SqlitePool) -> Result<()> {
    for (id, name) in REFERENCE_GENRES {
        sqlx::query("INSERT OR IGNORE INTO genres (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
    }

    for (id, name) in REFERENCE_RATINGS {
        sqlx::query("INSERT OR IGNORE INTO ratings (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
    }

    debug!(
        genres = REFERENCE_GENRES.len(),
        ratings = REFERENCE_RATINGS.len(),
        "reference data seeded"
    );
    Ok(())
}
