//! Request DTOs for the proxy API
//!
//! Query-string shapes of the inbound endpoints and their validation. Every
//! field is read as an optional string so values are validated here rather
//! than by serde.

use serde::Deserialize;

use crate::catalog::{ImageRedirect, ListingFilters, SortType, DEFAULT_PAGE};
use crate::error::{ProxyError, Result};

// == Helpers ==
/// Trims a raw parameter, treating blank as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the trimmed value or a validation error naming the parameter.
pub fn require(name: &str, value: Option<&str>) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ProxyError::Validation(format!("Missing required parameter: {}", name)))
}

fn parse_positive(name: &str, raw: &str) -> Result<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            ProxyError::Validation(format!("{} must be a positive integer, got '{}'", name, raw))
        })
}

/// Parses a four-digit release year.
pub fn parse_year(raw: &str) -> Result<u16> {
    let raw = raw.trim();
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(year) = raw.parse() {
            return Ok(year);
        }
    }
    Err(ProxyError::Validation(format!(
        "year must be a four-digit number, got '{}'",
        raw
    )))
}

fn parse_page(raw: &Option<String>) -> Result<u32> {
    present(raw).map_or(Ok(DEFAULT_PAGE), |p| parse_positive("page", p))
}

/// Query for `GET /api/phim-moi`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page, 1 when absent.
    pub fn page(&self) -> Result<u32> {
        parse_page(&self.page)
    }
}

/// Query for `GET /api/phim?slug=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailQuery {
    pub slug: Option<String>,
}

impl DetailQuery {
    /// Trimmed slug, required.
    pub fn slug(&self) -> Result<String> {
        require("slug", self.slug.as_deref())
    }
}

/// Keyword part of `GET /api/tim-kiem`; filters come from [`ListingQuery`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

impl SearchQuery {
    /// Trimmed search keyword, required.
    pub fn keyword(&self) -> Result<String> {
        require("keyword", self.keyword.as_deref())
    }
}

/// Query for `GET /api/image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

impl ImageQuery {
    /// Absolute http(s) image URL to redirect for.
    pub fn image(&self) -> Result<ImageRedirect> {
        ImageRedirect::parse(&require("url", self.url.as_deref())?)
    }
}

/// Filters accepted by search and the listing endpoints.
///
/// Parameters outside this set are ignored: not forwarded, not keyed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub sort_field: Option<String>,
    pub sort_type: Option<String>,
    pub sort_lang: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub year: Option<String>,
    pub limit: Option<String>,
}

impl ListingQuery {
    /// Validates and normalizes the filters.
    pub fn filters(&self) -> Result<ListingFilters> {
        let sort_type = present(&self.sort_type)
            .map(|raw| {
                SortType::parse(raw).ok_or_else(|| {
                    ProxyError::Validation(format!(
                        "sort_type must be 'asc' or 'desc', got '{}'",
                        raw
                    ))
                })
            })
            .transpose()?;

        Ok(ListingFilters {
            page: parse_page(&self.page)?,
            sort_field: present(&self.sort_field).map(str::to_owned),
            sort_type,
            sort_lang: present(&self.sort_lang).map(str::to_owned),
            category: present(&self.category).map(str::to_owned),
            country: present(&self.country).map(str::to_owned),
            year: present(&self.year).map(parse_year).transpose()?,
            limit: present(&self.limit)
                .map(|raw| parse_positive("limit", raw))
                .transpose()?,
        })
    }
}
