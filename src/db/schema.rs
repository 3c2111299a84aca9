//! Static schema bootstrap.
//!
//! Creates every table with `CREATE TABLE IF NOT EXISTS` so startup is
//! idempotent. The composite primary keys on `film_genres`,
//! `friendships` and `user_film_likes` are the storage-level
//! uniqueness constraints backing the check-then-insert paths: a
//! concurrent duplicate insert fails at the database instead of
//! producing a second edge.

use sqlx::SqlitePool;

use crate::error::Result;

pub async fn create_all(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ratings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
    )
    .execute(pool)
    .await?;

    // AUTOINCREMENT keeps deleted ids from being handed out again.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS films (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            release_date TEXT NOT NULL,
            duration INTEGER NOT NULL,
            rating_id INTEGER REFERENCES ratings(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS film_genres (
            film_id INTEGER NOT NULL REFERENCES films(id),
            genre_id INTEGER NOT NULL REFERENCES genres(id),
            sort_order INTEGER NOT NULL,
            PRIMARY KEY (film_id, genre_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            login TEXT NOT NULL,
            name TEXT NOT NULL,
            birthday TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS friendships (
            user_id INTEGER NOT NULL REFERENCES users(id),
            friend_id INTEGER NOT NULL REFERENCES users(id),
            status INTEGER NOT NULL,
            PRIMARY KEY (user_id, friend_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS user_film_likes (
            film_id INTEGER NOT NULL REFERENCES films(id),
            user_id INTEGER NOT NULL REFERENCES users(id),
            PRIMARY KEY (film_id, user_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_film_genres_order
         ON film_genres(film_id, sort_order)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_friendships_user_status
         ON friendships(user_id, status)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_likes_user
         ON user_film_likes(user_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
