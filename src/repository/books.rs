//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, NewBook},
};

const BOOK_COLUMNS: &str =
    "id, title, author, category, price, stock, cover_url, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books with search, category filter, sorting and pagination
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(q) = query.search() {
            params.push(format!("%{}%", q));
            conditions.push(format!(
                "(title ILIKE ${} OR author ILIKE ${})",
                params.len(),
                params.len()
            ));
        }

        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(category.to_string());
            conditions.push(format!("category = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total
        let count_query = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch page; sort column and direction come from the allow-list in BookQuery
        let select_query = format!(
            "SELECT {} FROM books {} ORDER BY {} {} LIMIT {} OFFSET {}",
            BOOK_COLUMNS,
            where_clause,
            query.sort_column(),
            query.sort_order(),
            query.limit(),
            query.offset()
        );
        let mut select_builder = sqlx::query_as::<_, Book>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book
    pub async fn create(&self, book: &NewBook, cover_url: Option<&str>) -> AppResult<Book> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author, category, price, stock, cover_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.price)
        .bind(book.stock)
        .bind(cover_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Persist all mutable columns of an existing book
    pub async fn update(&self, book: &Book) -> AppResult<Book> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author = $2, category = $3, price = $4, stock = $5,
                cover_url = $6, updated_at = $7
            WHERE id = $8
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.price)
        .bind(book.stock)
        .bind(&book.cover_url)
        .bind(now)
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(book.id).await
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
