//! Film operations: catalogue CRUD, likes and popularity ranking.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{EntityKind, Error, Result};
use crate::models::{CreateFilm, Film, Genre, UpdateFilm};
use crate::services::validator::EntityValidator;
use crate::store::{FilmStore, LikeStore};

/// Returned film count when the caller supplies none or a non-positive
/// value.
const DEFAULT_TOP_COUNT: i64 = 10;

pub struct FilmService {
    films: Arc<dyn FilmStore>,
    likes: Arc<dyn LikeStore>,
    validator: EntityValidator,
}

impl FilmService {
    pub fn new(
        films: Arc<dyn FilmStore>,
        likes: Arc<dyn LikeStore>,
        validator: EntityValidator,
    ) -> Self {
        Self { films, likes, validator }
    }

    /// Register a film. The rating id and every genre id are resolved
    /// against the store up front, so a film is never persisted with a
    /// dangling reference; duplicate genre ids keep their first
    /// occurrence only.
    pub async fn add_film(&self, input: CreateFilm) -> Result<Film> {
        debug!(name = %input.name, "registering film");

        let rating = self.validator.validate_rating_exists(input.rating_id).await?;
        let genres = self.resolve_genres(&input.genre_ids).await?;

        let film = Film {
            id: 0,
            name: input.name,
            description: input.description,
            release_date: input.release_date,
            duration: input.duration,
            rating: Some(rating),
            genres,
        };

        let film = self.films.create(film).await?;
        info!(film_id = film.id, "film registered");
        Ok(film)
    }

    pub async fn get_film(&self, id: i64) -> Result<Film> {
        self.films
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::Film, id })
    }

    pub async fn list_films(&self) -> Result<Vec<Film>> {
        self.films.list().await
    }

    /// Replace every mutable field of an existing film, rating and
    /// genre list included.
    pub async fn update_film(&self, id: i64, input: UpdateFilm) -> Result<Film> {
        if self.films.get(id).await?.is_none() {
            warn!(film_id = id, "update requested for missing film");
            return Err(Error::NotFound { kind: EntityKind::Film, id });
        }

        let rating = self.validator.validate_rating_exists(input.rating_id).await?;
        let genres = self.resolve_genres(&input.genre_ids).await?;

        let film = Film {
            id,
            name: input.name,
            description: input.description,
            release_date: input.release_date,
            duration: input.duration,
            rating: Some(rating),
            genres,
        };

        self.films.update(&film).await?;
        info!(film_id = id, "film updated");
        Ok(film)
    }

    pub async fn delete_film(&self, id: i64) -> Result<()> {
        if !self.films.delete(id).await? {
            warn!(film_id = id, "delete requested for missing film");
            return Err(Error::NotFound { kind: EntityKind::Film, id });
        }
        info!(film_id = id, "film deleted");
        Ok(())
    }

    pub async fn add_like(&self, film_id: i64, user_id: i64) -> Result<()> {
        self.validator.validate_film_exists(film_id).await?;
        self.validator.validate_user_exists(user_id).await?;
        self.likes.add(film_id, user_id).await?;
        debug!(film_id, user_id, "like recorded");
        Ok(())
    }

    pub async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<()> {
        self.validator.validate_film_exists(film_id).await?;
        self.validator.validate_user_exists(user_id).await?;
        self.likes.remove(film_id, user_id).await?;
        debug!(film_id, user_id, "like removed");
        Ok(())
    }

    /// User ids that like the film.
    pub async fn likes_of(&self, film_id: i64) -> Result<HashSet<i64>> {
        self.validator.validate_film_exists(film_id).await?;
        self.likes.users_for_film(film_id).await
    }

    /// The most-liked films, best first. `None` or a non-positive
    /// count falls back to the default of 10; films nobody likes are
    /// never returned.
    pub async fn most_liked(&self, count: Option<i64>) -> Result<Vec<Film>> {
        let limit = match count {
            Some(count) if count > 0 => count,
            _ => DEFAULT_TOP_COUNT,
        };

        let ids = self.likes.top_films(limit).await?;
        self.films.get_many(&ids).await
    }

    async fn resolve_genres(&self, genre_ids: &[i64]) -> Result<Vec<Genre>> {
        let mut genres = Vec::with_capacity(genre_ids.len());
        let mut seen = HashSet::new();
        for &id in genre_ids {
            if seen.insert(id) {
                genres.push(self.validator.validate_genre_exists(id).await?);
            }
        }
        Ok(genres)
    }
}
