//! Read-only access to seeded genre and rating reference data.

use std::sync::Arc;

use crate::error::{EntityKind, Error, Result};
use crate::models::{Genre, Rating};
use crate::store::{GenreStore, RatingStore};

pub struct ReferenceService {
    genres: Arc<dyn GenreStore>,
    ratings: Arc<dyn RatingStore>,
}

impl ReferenceService {
    pub fn new(genres: Arc<dyn GenreStore>, ratings: Arc<dyn RatingStore>) -> Self {
        Self { genres, ratings }
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.genres.list().await
    }

    pub async fn get_genre(&self, id: i64) -> Result<Genre> {
        self.genres
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::Genre, id })
    }

    pub async fn list_ratings(&self) -> Result<Vec<Rating>> {
        self.ratings.list().await
    }

    pub async fn get_rating(&self, id: i64) -> Result<Rating> {
        self.ratings
            .get(id)
            .await?
            .ok_or(Error::NotFound { kind: EntityKind::Rating, id })
    }
}
