//! Database connection and repositories.
//!
//! One repository per table, all sharing the pool owned by
//! [`Database`]. Schema bootstrap and reference-data seeding run once
//! at startup via [`Database::init`].

pub mod film_rows;
pub mod films;
pub mod friendships;
pub mod genres;
pub mod likes;
pub mod ratings;
pub mod schema;
pub mod seed;
pub mod users;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

pub use film_rows::{collapse, FilmRow};
pub use films::FilmRepository;
pub use friendships::FriendshipRepository;
pub use genres::GenreRepository;
pub use likes::LikeRepository;
pub use ratings::RatingRepository;
pub use users::UserRepository;

use crate::config::Config;
use crate::error::Result;

/// Database wrapper providing connection pool access.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool against the given SQLite URL with default pool
    /// sizing.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with(&Config {
            database_url: url.to_string(),
            max_connections: 5,
        })
        .await
    }

    /// Open a pool using the supplied configuration.
    pub async fn connect_with(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the schema and load reference data. Idempotent.
    pub async fn init(&self) -> Result<()> {
        schema::create_all(&self.pool).await?;
        seed::run_seeds(&self.pool).await?;
        info!("database schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn films(&self) -> FilmRepository {
        FilmRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn genres(&self) -> GenreRepository {
        GenreRepository::new(self.pool.clone())
    }

    pub fn ratings(&self) -> RatingRepository {
        RatingRepository::new(self.pool.clone())
    }

    pub fn friendships(&self) -> FriendshipRepository {
        FriendshipRepository::new(self.pool.clone())
    }

    pub fn likes(&self) -> LikeRepository {
        LikeRepository::new(self.pool.clone())
    }
}
