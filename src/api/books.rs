//! Book catalog endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, BookQuery, NewBook},
    services::storage::CoverUpload,
};

use super::AuthenticatedUser;

/// Paginated book listing
#[derive(Serialize, ToSchema)]
pub struct PagedBooks {
    pub items: Vec<Book>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Message payload for delete confirmations
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Raw multipart fields of a book form
#[derive(Debug, Default)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub cover: Option<CoverUpload>,
}

fn bad_part(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("invalid multipart body: {}", e))
}

impl BookForm {
    /// Read the multipart body into memory
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_part)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "cover" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await.map_err(bad_part)?.to_vec();
                    form.cover = Some(CoverUpload { filename, data });
                }
                "title" => form.title = Some(field.text().await.map_err(bad_part)?),
                "author" => form.author = Some(field.text().await.map_err(bad_part)?),
                "category" => form.category = Some(field.text().await.map_err(bad_part)?),
                "price" => form.price = Some(field.text().await.map_err(bad_part)?),
                "stock" => form.stock = Some(field.text().await.map_err(bad_part)?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Strict conversion used by create: title is required and numeric
    /// fields must parse.
    pub fn into_new_book(self) -> AppResult<(NewBook, Option<CoverUpload>)> {
        let title = self.title.unwrap_or_default();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }

        let price = match self.price.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse()
                .map_err(|_| AppError::BadRequest("price must be a number".to_string()))?,
            None => 0.0,
        };

        let stock = match self.stock.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse()
                .map_err(|_| AppError::BadRequest("stock must be an integer".to_string()))?,
            None => 0,
        };

        let book = NewBook {
            title,
            author: self.author.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price,
            stock,
        };

        Ok((book, self.cover))
    }

    /// Lenient conversion used by update: empty or unparseable fields are
    /// skipped instead of overwriting.
    pub fn into_patch(self) -> (BookPatch, Option<CoverUpload>) {
        let patch = BookPatch {
            title: self.title.filter(|s| !s.is_empty()),
            author: self.author.filter(|s| !s.is_empty()),
            category: self.category.filter(|s| !s.is_empty()),
            price: self.price.and_then(|s| s.parse().ok()),
            stock: self.stock.and_then(|s| s.parse().ok()),
        };

        (patch, self.cover)
    }
}

/// List books with search and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Paginated list of books", body = PagedBooks)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PagedBooks>> {
    let (items, total) = state.services.catalog.list_books(&query).await?;

    Ok(Json(PagedBooks {
        items,
        total,
        page: query.page(),
        limit: query.limit(),
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book from a multipart form
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Book>)> {
    let form = BookForm::from_multipart(multipart).await?;
    let (book, cover) = form.into_new_book()?;

    let created = state.services.catalog.create_book(book, cover).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book; only submitted non-empty fields overwrite
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid cover file"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<Book>> {
    let form = BookForm::from_multipart(multipart).await?;
    let (patch, cover) = form.into_patch();

    let updated = state.services.catalog.update_book(id, patch, cover).await?;
    Ok(Json(updated))
}

/// Delete a book and its stored cover
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_book(id).await?;

    Ok(Json(MessageResponse {
        message: format!("book {} deleted", id),
    }))
}
