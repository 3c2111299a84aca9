//! Friendship edge repository.
//!
//! A friendship is two directional rows in `friendships`, one per
//! direction, each carrying its own status code. The composite primary
//! key on (user_id, friend_id) is the uniqueness constraint that stops
//! concurrent duplicate requests; violations surface as the typed
//! `FriendRequestExists` condition.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{Friendship, FriendshipStatus};
use crate::store::FriendshipStore;

pub struct FriendshipRepository {
    pool: SqlitePool,
}

impl FriendshipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert both directional edges as PENDING in one transaction.
    pub async fn insert_pending(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (from, to) in [(user_id, friend_id), (friend_id, user_id)] {
            let inserted = sqlx::query(
                "INSERT INTO friendships (user_id, friend_id, status) VALUES (?, ?, ?)",
            )
            .bind(from)
            .bind(to)
            .bind(FriendshipStatus::Pending.code())
            .execute(&mut *tx)
            .await;

            if let Err(err) = inserted {
                if Error::is_unique_violation(&err) {
                    return Err(Error::FriendRequestExists { user_id, friend_id });
                }
                return Err(err.into());
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Flip both directional edges from PENDING to ACCEPTED. Fails when
    /// no pending edge exists for the pair.
    pub async fn accept(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for (from, to) in [(user_id, friend_id), (friend_id, user_id)] {
            let result = sqlx::query(
                "UPDATE friendships SET status = ? WHERE user_id = ? AND friend_id = ? AND status = ?",
            )
            .bind(FriendshipStatus::Accepted.code())
            .bind(from)
            .bind(to)
            .bind(FriendshipStatus::Pending.code())
            .execute(&mut *tx)
            .await?;

            affected += result.rows_affected();
        }

        if affected == 0 {
            return Err(Error::PendingRequestNotFound { user_id, friend_id });
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete both directional edges. Idempotent.
    pub async fn remove(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (from, to) in [(user_id, friend_id), (friend_id, user_id)] {
            sqlx::query("DELETE FROM friendships WHERE user_id = ? AND friend_id = ?")
                .bind(from)
                .bind(to)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find(&self, user_id: i64, friend_id: i64) -> Result<Option<Friendship>> {
        let row = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT user_id, friend_id, status FROM friendships WHERE user_id = ? AND friend_id = ?",
        )
        .bind(user_id)
        .bind(friend_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some((user_id, friend_id, code)) => {
                let status = FriendshipStatus::from_code(code).ok_or_else(|| {
                    Error::Database(sqlx::Error::Decode(
                        format!("invalid friendship status code {code}").into(),
                    ))
                })?;
                Ok(Some(Friendship { user_id, friend_id, status }))
            }
        }
    }

    /// Targets of ACCEPTED out-edges of the given user.
    pub async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT friend_id FROM friendships WHERE user_id = ? AND status = ? ORDER BY friend_id",
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted.code())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl FriendshipStore for FriendshipRepository {
    async fn insert_pending(&self, user_id: i64, friend_id: i64) -> Result<()> {
        FriendshipRepository::insert_pending(self, user_id, friend_id).await
    }

    async fn accept(&self, user_id: i64, friend_id: i64) -> Result<()> {
        FriendshipRepository::accept(self, user_id, friend_id).await
    }

    async fn remove(&self, user_id: i64, friend_id: i64) -> Result<()> {
        FriendshipRepository::remove(self, user_id, friend_id).await
    }

    async fn find(&self, user_id: i64, friend_id: i64) -> Result<Option<Friendship>> {
        FriendshipRepository::find(self, user_id, friend_id).await
    }

    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        FriendshipRepository::accepted_friend_ids(self, user_id).await
    }
}
