//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Sort columns accepted by the book listing
const SORT_COLUMNS: &[&str] = &["title", "category", "price", "created_at"];
const DEFAULT_SORT: &str = "created_at";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Full book model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    /// URL path of the stored cover image, if any
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Apply a partial update; fields absent from the patch keep their value.
    pub fn apply_patch(&mut self, patch: &BookPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref author) = patch.author {
            self.author = author.clone();
        }
        if let Some(ref category) = patch.category {
            self.category = category.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
    }
}

/// New book data, parsed from the create form
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
}

/// Partial book update, parsed from the update form
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring search on title or author
    pub q: Option<String>,
    /// Filter by exact category
    pub category: Option<String>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Page size, 1-100 (default: 10)
    pub limit: Option<i64>,
    /// Sort column: title, category, price or created_at
    pub sort: Option<String>,
    /// Sort direction: ASC or DESC
    pub order: Option<String>,
}

impl BookQuery {
    /// Page number, at least 1.
    pub fn page(&self) -> i64 {
        match self.page {
            Some(p) if p >= 1 => p,
            _ => DEFAULT_PAGE,
        }
    }

    /// Page size: capped at 100, zero or negative values fall back to 10.
    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(l) if l > MAX_LIMIT => MAX_LIMIT,
            Some(l) if l >= 1 => l,
            _ => DEFAULT_LIMIT,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Sort column, restricted to the allow-list.
    pub fn sort_column(&self) -> &str {
        match self.sort.as_deref() {
            Some(s) if SORT_COLUMNS.contains(&s) => s,
            _ => DEFAULT_SORT,
        }
    }

    /// Sort direction: anything other than ASC becomes DESC.
    pub fn sort_order(&self) -> &'static str {
        match self.order.as_deref() {
            Some(o) if o.eq_ignore_ascii_case("ASC") => "ASC",
            _ => "DESC",
        }
    }

    /// Trimmed free-text search term, if non-empty.
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, limit: Option<i64>) -> BookQuery {
        BookQuery {
            page,
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(query(None, None).page(), 1);
        assert_eq!(query(Some(0), None).page(), 1);
        assert_eq!(query(Some(-3), None).page(), 1);
        assert_eq!(query(Some(7), None).page(), 7);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(query(None, None).limit(), 10);
        assert_eq!(query(None, Some(0)).limit(), 10);
        assert_eq!(query(None, Some(-5)).limit(), 10);
        assert_eq!(query(None, Some(25)).limit(), 25);
        assert_eq!(query(None, Some(100)).limit(), 100);
        assert_eq!(query(None, Some(500)).limit(), 100);
    }

    #[test]
    fn test_offset() {
        assert_eq!(query(Some(3), Some(20)).offset(), 40);
        assert_eq!(query(None, None).offset(), 0);
    }

    #[test]
    fn test_sort_column_allow_list() {
        let mut q = BookQuery::default();
        assert_eq!(q.sort_column(), "created_at");
        q.sort = Some("price".to_string());
        assert_eq!(q.sort_column(), "price");
        q.sort = Some("id; DROP TABLE books".to_string());
        assert_eq!(q.sort_column(), "created_at");
    }

    #[test]
    fn test_sort_order_forced_to_desc() {
        let mut q = BookQuery::default();
        assert_eq!(q.sort_order(), "DESC");
        q.order = Some("asc".to_string());
        assert_eq!(q.sort_order(), "ASC");
        q.order = Some("ASC".to_string());
        assert_eq!(q.sort_order(), "ASC");
        q.order = Some("sideways".to_string());
        assert_eq!(q.sort_order(), "DESC");
    }

    #[test]
    fn test_search_trims_empty() {
        let mut q = BookQuery::default();
        assert_eq!(q.search(), None);
        q.q = Some("   ".to_string());
        assert_eq!(q.search(), None);
        q.q = Some("  orwell ".to_string());
        assert_eq!(q.search(), Some("orwell"));
    }

    #[test]
    fn test_apply_patch_partial() {
        let mut book = Book {
            id: 1,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            category: "Fiction".to_string(),
            price: 60000.0,
            stock: 10,
            cover_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        book.apply_patch(&BookPatch {
            title: Some("Animal Farm".to_string()),
            price: Some(45000.0),
            ..Default::default()
        });

        assert_eq!(book.title, "Animal Farm");
        assert_eq!(book.price, 45000.0);
        // untouched fields keep their values
        assert_eq!(book.author, "George Orwell");
        assert_eq!(book.category, "Fiction");
        assert_eq!(book.stock, 10);
    }
}
