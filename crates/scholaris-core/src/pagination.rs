//! Page-based pagination for list endpoints.
//!
//! Pages are 1-indexed. `per_page` is clamped to `1..=MAX_PER_PAGE`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Reads an optional query value through [`FromStr`], mapping blank values
/// such as `?page=` to `None`.
///
/// Needed on every numeric field of a struct that is `#[serde(flatten)]`ed
/// into a query struct, since those only ever receive strings.
pub fn optional_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse::<T>().map_err(serde::de::Error::custom))
        .transpose()
}

/// Requested page of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-indexed page number (default: 1)
    #[serde(default, deserialize_with = "optional_from_str")]
    pub page: Option<u32>,
    /// Items per page (1-100, default: 20)
    #[serde(default, deserialize_with = "optional_from_str")]
    pub per_page: Option<u32>,
}

impl PaginationParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// SQL `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    /// SQL `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }
}

/// Where a returned page sits within the full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    /// Items matching the query across all pages
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let per_page = params.limit();
        Self {
            page: params.page(),
            per_page: params.per_page(),
            total,
            total_pages: (total.max(0) + per_page - 1) / per_page,
        }
    }

    pub fn has_next(&self) -> bool {
        i64::from(self.page) < self.total_pages
    }
}
