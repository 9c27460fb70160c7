//! Movie lookups with the not-found policy applied.
//!
//! Every lookup runs exactly one parameterized SELECT. An empty result is
//! reported as [`DbError::NotFound`] carrying the lookup's own message, never
//! as an empty envelope.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::db::{DbError, DbResult, Movie, MovieRepo, MovieStore, Repository};

pub const NO_MOVIES: &str = "No movies found";
pub const NO_MOVIES_WITH_GENRE: &str = "No movies found with given genre";
pub const NO_MOVIES_WITH_ID: &str = "No movies found with given ID";
pub const NO_MOVIES_WITH_RELEASE_YEAR: &str = "No movies found with given release year";

/// Success payload. Serializes as `{"movies": [...]}` or `{"movie": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    Movies(Vec<Movie>),
    Movie(Vec<Movie>),
}

impl Envelope {
    pub fn rows(&self) -> &[Movie] {
        match self {
            Envelope::Movies(rows) | Envelope::Movie(rows) => rows,
        }
    }
}

/// Current repository, or `ConnectionUnavailable` logged against `op`.
fn connected(store: &MovieStore, op: &str) -> DbResult<Arc<dyn Repository>> {
    store.repo().map_err(|e| {
        error!(op, "Error in fetching movies: {}", e);
        e
    })
}

fn classify(
    op: &str,
    result: DbResult<Vec<Movie>>,
    not_found: &str,
    wrap: fn(Vec<Movie>) -> Envelope,
) -> DbResult<Envelope> {
    match result {
        Ok(rows) if rows.is_empty() => {
            warn!(op, "{}", not_found);
            Err(DbError::NotFound(not_found.to_string()))
        }
        Ok(rows) => {
            debug!(op, rows = rows.len(), "query ok");
            Ok(wrap(rows))
        }
        Err(e) => {
            error!(op, "Error in fetching movies: {}", e);
            Err(e)
        }
    }
}

pub async fn get_all_movies(store: &MovieStore) -> DbResult<Envelope> {
    let repo = connected(store, "all")?;
    classify("all", repo.all_movies().await, NO_MOVIES, Envelope::Movies)
}

pub async fn get_movies_by_genre(store: &MovieStore, genre: &str) -> DbResult<Envelope> {
    let repo = connected(store, "by_genre")?;
    let rows = repo.movies_by_genre(genre).await;
    classify("by_genre", rows, NO_MOVIES_WITH_GENRE, Envelope::Movies)
}

pub async fn get_movie_by_id(store: &MovieStore, id: &str) -> DbResult<Envelope> {
    let repo = connected(store, "by_id")?;
    let rows = repo.movies_by_id(id).await;
    classify("by_id", rows, NO_MOVIES_WITH_ID, Envelope::Movie)
}

pub async fn get_movies_by_release_year(store: &MovieStore, year: &str) -> DbResult<Envelope> {
    let repo = connected(store, "by_release_year")?;
    let rows = repo.movies_by_release_year(year).await;
    classify("by_release_year", rows, NO_MOVIES_WITH_RELEASE_YEAR, Envelope::Movies)
}
