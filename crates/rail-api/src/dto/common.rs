//! Common DTOs used across the API

use rail_core::traits::{PaginatedResponse, PaginationMeta};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    /// Create a success response with data and message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}

/// Highest page number a listing accepts
pub const MAX_PAGE: i64 = 100_000;

/// Largest page size a listing accepts
pub const MAX_PER_PAGE: i64 = 500;

/// Paging of list endpoints, read from `?page=&per_page=`
///
/// Both bounds are checked by `validate()`; `MAX_PAGE * MAX_PER_PAGE` keeps
/// the row offset far inside `i64`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    /// 1-based page
    #[serde(default = "first_page", deserialize_with = "lenient_i64")]
    #[validate(range(min = 1, max = 100_000, message = "page must be between 1 and 100000"))]
    pub page: i64,

    #[serde(default = "standard_page_size", deserialize_with = "lenient_i64")]
    #[validate(range(min = 1, max = 500, message = "per_page must be between 1 and 500"))]
    pub per_page: i64,
}

/// Query strings carry every value as text while JSON bodies carry numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("'{}' is not a whole number: {}", s, e))),
    }
}

fn first_page() -> i64 {
    1
}

fn standard_page_size() -> i64 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: first_page(),
            per_page: standard_page_size(),
        }
    }
}

impl PaginationParams {
    /// Rows to skip; saturates instead of wrapping when called before `validate()`
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.per_page.max(0))
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Create pagination metadata
    pub fn metadata(&self, total: i64) -> PaginationMeta {
        PaginationMeta::new(total, self.page, self.per_page)
    }

    /// Create paginated response
    pub fn paginate<T>(&self, data: Vec<T>, total: i64) -> PaginatedResponse<T> {
        PaginatedResponse {
            data,
            pagination: self.metadata(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_offset() {
        let params = PaginationParams {
            page: 1,
            per_page: 10,
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 10);

        let params = PaginationParams {
            page: 3,
            per_page: 20,
        };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_pagination_bounds_validated() {
        let params = PaginationParams {
            page: 0,
            per_page: 10,
        };
        assert!(params.validate().is_err());

        let params = PaginationParams {
            page: 1,
            per_page: 501,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_huge_page_is_rejected_without_overflow() {
        let params = PaginationParams {
            page: i64::MAX,
            per_page: 50,
        };
        assert!(params.validate().is_err());
        assert_eq!(params.offset(), i64::MAX);

        let params = PaginationParams {
            page: MAX_PAGE,
            per_page: MAX_PER_PAGE,
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.offset(), (MAX_PAGE - 1) * MAX_PER_PAGE);
    }

    #[test]
    fn test_numbers_accepted_as_text() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page": " 3 ", "per_page": 20}"#).unwrap();
        assert_eq!(params.offset(), 40);

        assert!(serde_json::from_str::<PaginationParams>(r#"{"page": "three"}"#).is_err());
    }

    #[test]
    fn test_api_response() {
        let resp = ApiResponse::success("test");
        assert_eq!(resp.data, "test");
        assert!(resp.message.is_none());

        let resp = ApiResponse::with_message("data", "success");
        assert_eq!(resp.message, Some("success".to_string()));
    }
}
