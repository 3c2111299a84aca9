//! Domain models shared by the storage backends and the service layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference rating classification (G, PG, ...). Seeded, read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub name: String,
}

/// Reference genre. Seeded, read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// A film with its single rating and ordered, duplicate-free genre list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    /// Duration in minutes.
    pub duration: i32,
    pub rating: Option<Rating>,
    pub genres: Vec<Genre>,
}

/// Input for registering a film. Rating and genres arrive as reference
/// ids and are resolved against the store before construction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFilm {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating_id: i64,
    pub genre_ids: Vec<i64>,
}

/// Input for updating a film. All mutable fields are replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFilm {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating_id: i64,
    pub genre_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub login: String,
    /// Display name; falls back to the login when left blank at registration.
    pub name: String,
    pub birthday: NaiveDate,
}

/// Input for registering a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

/// Input for updating a user. All mutable fields are replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

/// Lifecycle of one directional friendship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    /// Integer code used in the friendships table.
    pub fn code(self) -> i64 {
        match self {
            FriendshipStatus::Pending => 1,
            FriendshipStatus::Accepted => 2,
            FriendshipStatus::Rejected => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(FriendshipStatus::Pending),
            2 => Some(FriendshipStatus::Accepted),
            3 => Some(FriendshipStatus::Rejected),
            _ => None,
        }
    }
}

/// One directional friendship edge. A friendship between two users is
/// stored as two of these, one per direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub user_id: i64,
    pub friend_id: i64,
    pub status: FriendshipStatus,
}
