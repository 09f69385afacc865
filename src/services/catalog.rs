//! Book catalog service: business logic over the books repository,
//! including the cover-file lifecycle.

use crate::{
    error::AppResult,
    models::book::{Book, BookPatch, BookQuery, NewBook},
    repository::Repository,
    services::storage::{CoverStore, CoverUpload},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    covers: CoverStore,
}

impl CatalogService {
    pub fn new(repository: Repository, covers: CoverStore) -> Self {
        Self { repository, covers }
    }

    /// List books with search, filtering, sorting and pagination
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(query).await
    }

    /// Get a single book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book, storing its cover first when one was uploaded
    pub async fn create_book(
        &self,
        book: NewBook,
        cover: Option<CoverUpload>,
    ) -> AppResult<Book> {
        let cover_url = match cover {
            Some(ref upload) => Some(self.covers.save(upload).await?),
            None => None,
        };

        self.repository
            .books
            .create(&book, cover_url.as_deref())
            .await
    }

    /// Apply a partial update. A replacement cover is stored before the old
    /// file is removed.
    pub async fn update_book(
        &self,
        id: i32,
        patch: BookPatch,
        cover: Option<CoverUpload>,
    ) -> AppResult<Book> {
        let mut book = self.repository.books.get_by_id(id).await?;
        book.apply_patch(&patch);

        if let Some(ref upload) = cover {
            let url = self.covers.save(upload).await?;
            if let Some(old) = book.cover_url.replace(url) {
                self.covers.delete(&old).await;
            }
        }

        self.repository.books.update(&book).await
    }

    /// Delete a book and its stored cover, if any
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let book = self.repository.books.get_by_id(id).await?;

        if let Some(ref url) = book.cover_url {
            self.covers.delete(url).await;
        }

        self.repository.books.delete(id).await
    }
}
