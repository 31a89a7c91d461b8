// Page/size query parameters shared by the fetch endpoints

use serde::Deserialize;

use crate::db::repository::{Record, Repository};
use crate::errors::{ApiError, ValidationError};
use crate::response::ApiResponse;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_SIZE: i64 = 10;

/// 1-based page request, `?page=2&size=20`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_size() -> i64 {
    DEFAULT_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// Check the request against the number of stored records.
    ///
    /// The zero-based page index may equal the page count, which yields an
    /// empty page rather than an error.
    pub fn validate(&self, total: i64) -> Result<(), ValidationError> {
        if self.size < 1 {
            return Err(ValidationError::InvalidPageSize);
        }
        let index = match self.page.checked_sub(1) {
            Some(index) if index >= 0 => index,
            _ => return Err(ValidationError::PageBelowRange),
        };
        if index > page_count(total, self.size) {
            return Err(ValidationError::PageAboveRange(self.page));
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// ceil(total / size) for positive sizes
pub fn page_count(total: i64, size: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        total / size + i64::from(total % size != 0)
    }
}

pub fn page_message(page: i64, returned: usize, title: &str) -> String {
    format!(
        "Fetching page {} with {} {} data records",
        page, returned, title
    )
}

/// Validate the request, load the page and wrap it in the envelope.
pub async fn fetch_page<R, S>(
    store: &S,
    request: PageRequest,
) -> Result<ApiResponse<Vec<R>>, ApiError>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    let total = store.count().await?;
    request.validate(total)?;

    let records = store.fetch_page(request.limit(), request.offset()).await?;
    tracing::debug!(page = request.page, size = request.size, returned = records.len(), "Fetched page");

    Ok(ApiResponse::success(
        page_message(request.page, records.len(), R::TITLE),
        records,
    ))
}
