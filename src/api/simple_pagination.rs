// src/api/simple_pagination.rs
//! Cursor pagination driven by an async closure.

use super::types::Paginated;
use crate::error::AppError;

/// Fetches every page of a listing, passing the previous page's cursor to
/// the next call.
///
/// Stops when a page reports `has_more == false` or carries no cursor.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_fn: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<Paginated<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch_fn(cursor).await?;
        pages_fetched += 1;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);

        if !has_more || cursor.is_none() {
            break;
        }
    }

    log::debug!(
        "Pagination finished: {} items over {} requests",
        all_items.len(),
        pages_fetched
    );

    Ok(all_items)
}
