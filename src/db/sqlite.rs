use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::model::*;
use super::repo::*;

const SELECT_MOVIES: &str = "SELECT id, title, director, genre, release_year, rating, actor, box_office_collection FROM movies";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens an existing database read-only. The `movies` table is owned by
    /// whoever seeded the file, so nothing is created here.
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Database opened at {}", db_path);

        Ok(Self { pool })
    }

    async fn fetch_where(&self, column: &str, value: &str) -> DbResult<Vec<Movie>> {
        let query = format!("{} WHERE {} = ?", SELECT_MOVIES, column);
        let movies = sqlx::query_as::<_, Movie>(&query)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn all_movies(&self) -> DbResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(SELECT_MOVIES)
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn movies_by_genre(&self, genre: &str) -> DbResult<Vec<Movie>> {
        self.fetch_where("genre", genre).await
    }

    // id and release_year are bound as text; the INTEGER column affinity
    // converts numeric strings before comparing.
    async fn movies_by_id(&self, id: &str) -> DbResult<Vec<Movie>> {
        self.fetch_where("id", id).await
    }

    async fn movies_by_release_year(&self, year: &str) -> DbResult<Vec<Movie>> {
        self.fetch_where("release_year", year).await
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn close(&self) {
        self.pool.close().await;
    }
}
