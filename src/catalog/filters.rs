//! Listing Filters
//!
//! Validated query filters shared by search and the genre, country, year and
//! list-type listings.

/// Page used when the caller does not send one
pub const DEFAULT_PAGE: u32 = 1;

// == Sort Direction ==
/// Sort direction accepted by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
    Asc,
    Desc,
}

impl SortType {
    /// Parses `asc` or `desc`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortType::Asc),
            "desc" => Some(SortType::Desc),
            _ => None,
        }
    }

    /// Wire value sent upstream.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Asc => "asc",
            SortType::Desc => "desc",
        }
    }
}

// == Listing Filters ==
/// Filters forwarded to the catalog. Every field here is part of the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilters {
    pub page: u32,
    pub sort_field: Option<String>,
    pub sort_type: Option<SortType>,
    pub sort_lang: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub year: Option<u16>,
    pub limit: Option<u32>,
}

impl Default for ListingFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            sort_field: None,
            sort_type: None,
            sort_lang: None,
            category: None,
            country: None,
            year: None,
            limit: None,
        }
    }
}

impl ListingFilters {
    /// Returns the filters as query pairs, absent ones omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(v) = &self.sort_field {
            params.push(("sort_field", v.clone()));
        }
        if let Some(v) = self.sort_type {
            params.push(("sort_type", v.as_str().to_string()));
        }
        if let Some(v) = &self.sort_lang {
            params.push(("sort_lang", v.clone()));
        }
        if let Some(v) = &self.category {
            params.push(("category", v.clone()));
        }
        if let Some(v) = &self.country {
            params.push(("country", v.clone()));
        }
        if let Some(v) = self.year {
            params.push(("year", v.to_string()));
        }
        if let Some(v) = self.limit {
            params.push(("limit", v.to_string()));
        }
        params
    }
}
