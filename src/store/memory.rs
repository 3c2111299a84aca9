//! In-memory storage backend.
//!
//! One struct owns every table behind `parking_lot` locks and
//! implements all of the store traits, so a single `Arc<MemoryStore>`
//! can back the whole service layer in tests or small deployments.
//! Identifiers come from atomic counters and are never reused within
//! the process lifetime.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{EntityKind, Error, Result};
use crate::models::{Film, Friendship, FriendshipStatus, Genre, Rating, User};
use crate::store::{FilmStore, FriendshipStore, GenreStore, LikeStore, RatingStore, UserStore};

/// Lock order: films, users, friendships, likes. Every method that
/// holds more than one lock acquires them in that order.
#[derive(Default)]
pub struct MemoryStore {
    films: RwLock<BTreeMap<i64, Film>>,
    users: RwLock<BTreeMap<i64, User>>,
    genres: RwLock<BTreeMap<i64, Genre>>,
    ratings: RwLock<BTreeMap<i64, Rating>>,
    /// Directional edges keyed by (user_id, friend_id).
    friendships: RwLock<HashMap<(i64, i64), FriendshipStatus>>,
    /// Like edges keyed by (film_id, user_id).
    likes: RwLock<HashSet<(i64, i64)>>,
    next_film_id: AtomicI64,
    next_user_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_film_id: AtomicI64::new(1),
            next_user_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Load the same reference genres and ratings the relational
    /// backend seeds.
    pub fn with_reference_data() -> Self {
        let store = Self::new();
        {
            let mut genres = store.genres.write();
            for (id, name) in crate::db::seed::REFERENCE_GENRES {
                genres.insert(*id, Genre { id: *id, name: (*name).to_string() });
            }
            let mut ratings = store.ratings.write();
            for (id, name) in crate::db::seed::REFERENCE_RATINGS {
                ratings.insert(*id, Rating { id: *id, name: (*name).to_string() });
            }
        }
        store
    }
}

#[async_trait]
impl FilmStore for MemoryStore {
    async fn create(&self, mut film: Film) -> Result<Film> {
        film.id = self.next_film_id.fetch_add(1, Ordering::SeqCst);
        self.films.write().insert(film.id, film.clone());
        Ok(film)
    }

    async fn get(&self, id: i64) -> Result<Option<Film>> {
        Ok(self.films.read().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Film>> {
        Ok(self.films.read().values().cloned().collect())
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Film>> {
        let films = self.films.read();
        Ok(ids.iter().filter_map(|id| films.get(id).cloned()).collect())
    }

    async fn update(&self, film: &Film) -> Result<()> {
        self.films.write().insert(film.id, film.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // Hold the edge lock for the whole cascade so a concurrent
        // like cannot slip in between the two writes.
        let mut films = self.films.write();
        let mut likes = self.likes.write();

        if films.remove(&id).is_none() {
            return Ok(false);
        }
        likes.retain(|(film_id, _)| *film_id != id);
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, mut user: User) -> Result<User> {
        user.id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        self.users.write().insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.read().values().cloned().collect())
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<User>> {
        let users = self.users.read();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.users.write().insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut users = self.users.write();
        let mut friendships = self.friendships.write();
        let mut likes = self.likes.write();

        if users.remove(&id).is_none() {
            return Ok(false);
        }
        friendships.retain(|(a, b), _| *a != id && *b != id);
        likes.retain(|(_, user_id)| *user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Genre>> {
        Ok(self.genres.read().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Genre>> {
        Ok(self.genres.read().values().cloned().collect())
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Rating>> {
        Ok(self.ratings.read().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Rating>> {
        Ok(self.ratings.read().values().cloned().collect())
    }
}

#[async_trait]
impl FriendshipStore for MemoryStore {
    async fn insert_pending(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let users = self.users.read();
        let mut edges = self.friendships.write();

        for id in [user_id, friend_id] {
            if !users.contains_key(&id) {
                return Err(Error::NotFound { kind: EntityKind::User, id });
            }
        }
        if edges.contains_key(&(user_id, friend_id)) || edges.contains_key(&(friend_id, user_id)) {
            return Err(Error::FriendRequestExists { user_id, friend_id });
        }
        edges.insert((user_id, friend_id), FriendshipStatus::Pending);
        edges.insert((friend_id, user_id), FriendshipStatus::Pending);
        Ok(())
    }

    async fn accept(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut edges = self.friendships.write();
        let pending = edges.get(&(user_id, friend_id)) == Some(&FriendshipStatus::Pending)
            || edges.get(&(friend_id, user_id)) == Some(&FriendshipStatus::Pending);
        if !pending {
            return Err(Error::PendingRequestNotFound { user_id, friend_id });
        }
        edges.insert((user_id, friend_id), FriendshipStatus::Accepted);
        edges.insert((friend_id, user_id), FriendshipStatus::Accepted);
        Ok(())
    }

    async fn remove(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut edges = self.friendships.write();
        edges.remove(&(user_id, friend_id));
        edges.remove(&(friend_id, user_id));
        Ok(())
    }

    async fn find(&self, user_id: i64, friend_id: i64) -> Result<Option<Friendship>> {
        Ok(self
            .friendships
            .read()
            .get(&(user_id, friend_id))
            .map(|status| Friendship { user_id, friend_id, status: *status }))
    }

    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .friendships
            .read()
            .iter()
            .filter(|((a, _), status)| *a == user_id && **status == FriendshipStatus::Accepted)
            .map(|((_, b), _)| *b)
            .collect())
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn add(&self, film_id: i64, user_id: i64) -> Result<()> {
        let films = self.films.read();
        let users = self.users.read();
        let mut likes = self.likes.write();

        if !films.contains_key(&film_id) {
            return Err(Error::NotFound { kind: EntityKind::Film, id: film_id });
        }
        if !users.contains_key(&user_id) {
            return Err(Error::NotFound { kind: EntityKind::User, id: user_id });
        }
        if !likes.insert((film_id, user_id)) {
            return Err(Error::AlreadyLiked { film_id, user_id });
        }
        Ok(())
    }

    async fn remove(&self, film_id: i64, user_id: i64) -> Result<()> {
        if !self.likes.write().remove(&(film_id, user_id)) {
            return Err(Error::LikeNotFound { film_id, user_id });
        }
        Ok(())
    }

    async fn users_for_film(&self, film_id: i64) -> Result<HashSet<i64>> {
        Ok(self
            .likes
            .read()
            .iter()
            .filter(|(f, _)| *f == film_id)
            .map(|(_, u)| *u)
            .collect())
    }

    async fn top_films(&self, limit: i64) -> Result<Vec<i64>> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for (film_id, _) in self.likes.read().iter() {
            *counts.entry(*film_id).or_default() += 1;
        }
        let mut ranked: Vec<(i64, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked.into_iter().map(|(film_id, _)| film_id).collect())
    }
}
