//! User database repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::User;
use crate::store::UserStore;

type UserTuple = (i64, String, String, String, NaiveDate);

fn from_tuple(row: UserTuple) -> User {
    User {
        id: row.0,
        email: row.1,
        login: row.2,
        name: row.3,
        birthday: row.4,
    }
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, mut user: User) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (email, login, name, birthday) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .execute(&self.pool)
        .await?;

        user.id = result.last_insert_rowid();
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserTuple>(
            "SELECT id, email, login, name, birthday FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_tuple))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserTuple>(
            "SELECT id, email, login, name, birthday FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_tuple).collect())
    }

    /// Fetch users preserving the order of the requested ids.
    pub async fn get_many(&self, ids: &[i64]) -> Result<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.get(*id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }

    pub async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            "UPDATE users SET email = ?, login = ?, name = ?, birthday = ? WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete the user and cascade to friendship and like edges.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM friendships WHERE user_id = ? OR friend_id = ?")
            .bind(id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM user_film_likes WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: User) -> Result<User> {
        UserRepository::create(self, user).await
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        UserRepository::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>> {
        UserRepository::list(self).await
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<User>> {
        UserRepository::get_many(self, ids).await
    }

    async fn update(&self, user: &User) -> Result<()> {
        UserRepository::update(self, user).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        UserRepository::delete(self, id).await
    }
}
