//! Typed domain errors surfaced to the boundary layer.
//!
//! Every condition a caller may need to map to a distinct response is a
//! distinct variant; nothing here is retried internally and nothing is
//! fatal to the process.

use std::fmt;

use thiserror::Error;

/// Entity kinds referenced by [`Error::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Film,
    User,
    Genre,
    Rating,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Film => "film",
            EntityKind::User => "user",
            EntityKind::Genre => "genre",
            EntityKind::Rating => "rating",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("friend request between users {user_id} and {friend_id} already exists")]
    FriendRequestExists { user_id: i64, friend_id: i64 },

    #[error("no pending friend request between users {user_id} and {friend_id}")]
    PendingRequestNotFound { user_id: i64, friend_id: i64 },

    #[error("no friendship between users {user_id} and {friend_id}")]
    FriendshipNotFound { user_id: i64, friend_id: i64 },

    #[error("user {user_id} cannot befriend themselves")]
    SelfFriendship { user_id: i64 },

    #[error("user {user_id} already likes film {film_id}")]
    AlreadyLiked { film_id: i64, user_id: i64 },

    #[error("user {user_id} does not like film {film_id}")]
    LikeNotFound { film_id: i64, user_id: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Whether the underlying database error is a unique-constraint
    /// violation. Used by repositories to turn races on edge inserts
    /// into typed AlreadyExists conditions.
    pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db) => db.is_unique_violation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
