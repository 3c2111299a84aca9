//! Existence-check gateway.
//!
//! Every mutating friendship/like/film operation goes through these
//! checks first, so graph state never references a missing entity.

use std::sync::Arc;

use crate::error::{EntityKind, Error, Result};
use crate::models::{Film, Genre, Rating, User};
use crate::store::{FilmStore, GenreStore, RatingStore, UserStore};

#[derive(Clone)]
pub struct EntityValidator {
    films: Arc<dyn FilmStore>,
    users: Arc<dyn UserStore>,
    genres: Arc<dyn GenreStore>,
    ratings: Arc<dyn RatingStore>,
}

impl EntityValidator {
    pub fn new(
        films: Arc<dyn FilmStore>,
        users: Arc<dyn UserStore>,
        genres: Arc<dyn GenreStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self { films, users, genres, ratings }
    }

    pub async fn validate_film_exists(&self, id: i64) -> Result<Film> {
        self.films
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::Film, id })
    }

    pub async fn validate_user_exists(&self, id: i64) -> Result<User> {
        self.users
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::User, id })
    }

    pub async fn validate_genre_exists(&self, id: i64) -> Result<Genre> {
        self.genres
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::Genre, id })
    }

    pub async fn validate_rating_exists(&self, id: i64) -> Result<Rating> {
        self.ratings
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::Rating, id })
    }
}
