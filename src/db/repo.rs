use async_trait::async_trait;

use super::model::*;

/// Raw row lookups against the `movies` table.
///
/// Implementations return whatever the store holds, including an empty
/// vector; deciding that "no rows" is an error belongs to the query layer.
#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn all_movies(&self) -> DbResult<Vec<Movie>>;
    async fn movies_by_genre(&self, genre: &str) -> DbResult<Vec<Movie>>;
    async fn movies_by_id(&self, id: &str) -> DbResult<Vec<Movie>>;
    async fn movies_by_release_year(&self, year: &str) -> DbResult<Vec<Movie>>;
}

#[async_trait]
pub trait Repository: MovieRepo + Send + Sync {
    async fn close(&self);
}
