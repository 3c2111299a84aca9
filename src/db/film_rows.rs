//! Aggregation of flat join rows into films.
//!
//! The film queries join `films` against `ratings`, `film_genres` and
//! `genres`, so a film with N genres comes back as N rows (and a film
//! with none as a single row with null genre columns). [`collapse`]
//! folds that row stream back into nested [`Film`] values.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::models::{Film, Genre, Rating};

/// One row of the film join result.
#[derive(Debug, Clone)]
pub struct FilmRow {
    pub film_id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating_id: Option<i64>,
    pub rating_name: Option<String>,
    pub genre_id: Option<i64>,
    pub genre_name: Option<String>,
}

impl FromRow<'_, SqliteRow> for FilmRow {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            film_id: row.try_get("film_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            release_date: row.try_get("release_date")?,
            duration: row.try_get("duration")?,
            rating_id: row.try_get("rating_id")?,
            rating_name: row.try_get("rating_name")?,
            genre_id: row.try_get("genre_id")?,
            genre_name: row.try_get("genre_name")?,
        })
    }
}

/// Collapse join rows into films.
///
/// Films appear in the output in first-appearance order of their id.
/// Each film's genre list holds the first occurrence of every distinct
/// genre id, in row order; null genre columns are outer-join
/// placeholders and contribute nothing. The rating is taken from the
/// film's first row (it is constant across a film's rows).
pub fn collapse(rows: Vec<FilmRow>) -> Vec<Film> {
    let mut films: Vec<Film> = Vec::new();
    let mut index_by_id: HashMap<i64, usize> = HashMap::new();
    let mut seen_genres: HashSet<(i64, i64)> = HashSet::new();

    for row in rows {
        let idx = match index_by_id.get(&row.film_id) {
            Some(&idx) => idx,
            None => {
                let rating = row.rating_id.map(|id| Rating {
                    id,
                    name: row.rating_name.clone().unwrap_or_default(),
                });
                films.push(Film {
                    id: row.film_id,
                    name: row.name.clone(),
                    description: row.description.clone(),
                    release_date: row.release_date,
                    duration: row.duration,
                    rating,
                    genres: Vec::new(),
                });
                index_by_id.insert(row.film_id, films.len() - 1);
                films.len() - 1
            }
        };

        if let (Some(genre_id), Some(genre_name)) = (row.genre_id, row.genre_name) {
            if seen_genres.insert((row.film_id, genre_id)) {
                films[idx].genres.push(Genre { id: genre_id, name: genre_name });
            }
        }
    }

    films
}
