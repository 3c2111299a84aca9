//! Storage traits injected into the service layer.
//!
//! The same services run against either the in-memory backend
//! ([`memory::MemoryStore`]) or the sqlx repositories in [`crate::db`];
//! both implement the traits below. Uniqueness of friendship and like
//! edges is enforced by each backend itself (composite primary keys in
//! SQLite, pair-keyed maps in memory), not only by caller pre-checks.

pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Film, Friendship, Genre, Rating, User};

#[async_trait]
pub trait FilmStore: Send + Sync {
    /// Persist a fully-constructed film, assigning its id.
    async fn create(&self, film: Film) -> Result<Film>;
    async fn get(&self, id: i64) -> Result<Option<Film>>;
    async fn list(&self) -> Result<Vec<Film>>;
    /// Fetch films preserving the order of the requested ids; missing
    /// ids are skipped.
    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Film>>;
    async fn update(&self, film: &Film) -> Result<()>;
    /// Delete the film and cascade to its genre links and like edges.
    /// Returns false when no such film existed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: User) -> Result<User>;
    async fn get(&self, id: i64) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn get_many(&self, ids: &[i64]) -> Result<Vec<User>>;
    async fn update(&self, user: &User) -> Result<()>;
    /// Delete the user and cascade to friendship and like edges.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Genre>>;
    async fn list(&self) -> Result<Vec<Genre>>;
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Rating>>;
    async fn list(&self) -> Result<Vec<Rating>>;
}

#[async_trait]
pub trait FriendshipStore: Send + Sync {
    /// Insert both directional edges as PENDING. Fails with
    /// `FriendRequestExists` when either direction is already present;
    /// both users must exist (foreign keys in SQLite, existence checks
    /// in memory).
    async fn insert_pending(&self, user_id: i64, friend_id: i64) -> Result<()>;
    /// Transition both directional edges from PENDING to ACCEPTED.
    /// Fails with `PendingRequestNotFound` when no pending pair exists.
    async fn accept(&self, user_id: i64, friend_id: i64) -> Result<()>;
    /// Delete both directional edges unconditionally. Idempotent.
    async fn remove(&self, user_id: i64, friend_id: i64) -> Result<()>;
    async fn find(&self, user_id: i64, friend_id: i64) -> Result<Option<Friendship>>;
    /// Targets of ACCEPTED out-edges of the given user.
    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Record a like edge. Fails with `AlreadyLiked` when present; the
    /// film and user must both exist.
    async fn add(&self, film_id: i64, user_id: i64) -> Result<()>;
    /// Remove a like edge. Fails with `LikeNotFound` when absent.
    async fn remove(&self, film_id: i64, user_id: i64) -> Result<()>;
    async fn users_for_film(&self, film_id: i64) -> Result<HashSet<i64>>;
    /// Film ids by descending distinct-liker count, ties broken by
    /// ascending film id. Films with zero likes are excluded.
    async fn top_films(&self, limit: i64) -> Result<Vec<i64>>;
}
