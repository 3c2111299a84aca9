//! User operations: registration, profile CRUD and the friendship
//! graph.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{EntityKind, Error, Result};
use crate::models::{CreateUser, UpdateUser, User};
use crate::services::validator::EntityValidator;
use crate::store::{FriendshipStore, UserStore};

pub struct UserService {
    users: Arc<dyn UserStore>,
    friendships: Arc<dyn FriendshipStore>,
    validator: EntityValidator,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        friendships: Arc<dyn FriendshipStore>,
        validator: EntityValidator,
    ) -> Self {
        Self { users, friendships, validator }
    }

    /// Register a user. A blank or absent display name falls back to
    /// the login.
    pub async fn register_user(&self, input: CreateUser) -> Result<User> {
        debug!(login = %input.login, "registering user");

        let name = display_name(input.name, &input.login);
        let user = User {
            id: 0,
            email: input.email,
            login: input.login,
            name,
            birthday: input.birthday,
        };

        let user = self.users.create(user).await?;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.validator.validate_user_exists(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    /// Replace every mutable field of an existing user.
    pub async fn update_user(&self, id: i64, input: UpdateUser) -> Result<User> {
        if self.users.get(id).await?.is_none() {
            warn!(user_id = id, "update requested for missing user");
            return Err(Error::NotFound { kind: EntityKind::User, id });
        }

        let name = display_name(input.name, &input.login);
        let user = User {
            id,
            email: input.email,
            login: input.login,
            name,
            birthday: input.birthday,
        };

        self.users.update(&user).await?;
        info!(user_id = id, "user updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        if !self.users.delete(id).await? {
            warn!(user_id = id, "delete requested for missing user");
            return Err(Error::NotFound { kind: EntityKind::User, id });
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Send a friend request, creating both PENDING directional edges.
    pub async fn send_friend_request(&self, user_id: i64, friend_id: i64) -> Result<()> {
        if user_id == friend_id {
            return Err(Error::SelfFriendship { user_id });
        }
        self.validator.validate_user_exists(user_id).await?;
        self.validator.validate_user_exists(friend_id).await?;

        self.friendships.insert_pending(user_id, friend_id).await?;
        info!(user_id, friend_id, "friend request sent");
        Ok(())
    }

    /// Accept a pending friend request; afterwards both users list
    /// each other as friends.
    pub async fn accept_friend_request(&self, user_id: i64, friend_id: i64) -> Result<()> {
        self.validator.validate_user_exists(user_id).await?;
        self.validator.validate_user_exists(friend_id).await?;

        self.friendships.accept(user_id, friend_id).await?;
        info!(user_id, friend_id, "friend request accepted");
        Ok(())
    }

    /// Remove a friendship in both directions, whatever its status.
    pub async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<()> {
        self.validator.validate_user_exists(user_id).await?;
        self.validator.validate_user_exists(friend_id).await?;

        if self.friendships.find(user_id, friend_id).await?.is_none() {
            return Err(Error::FriendshipNotFound { user_id, friend_id });
        }

        self.friendships.remove(user_id, friend_id).await?;
        info!(user_id, friend_id, "friendship removed");
        Ok(())
    }

    /// Accepted friends of the user, ordered by id.
    pub async fn friends_of(&self, user_id: i64) -> Result<Vec<User>> {
        self.validator.validate_user_exists(user_id).await?;

        let mut ids = self.friendships.accepted_friend_ids(user_id).await?;
        ids.sort_unstable();
        self.users.get_many(&ids).await
    }

    /// Users that both arguments count as accepted friends, ordered by
    /// id.
    pub async fn mutual_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>> {
        self.validator.validate_user_exists(user_id).await?;
        self.validator.validate_user_exists(other_id).await?;

        let ids = self.friendships.accepted_friend_ids(user_id).await?;
        let other_ids: HashSet<i64> = self
            .friendships
            .accepted_friend_ids(other_id)
            .await?
            .into_iter()
            .collect();

        let mut shared: Vec<i64> = ids.into_iter().filter(|id| other_ids.contains(id)).collect();
        shared.sort_unstable();
        self.users.get_many(&shared).await
    }
}

fn display_name(name: Option<String>, login: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => login.to_string(),
    }
}
