//! Catalog Operations
//!
//! Each proxied endpoint is one [`Operation`]. The cache key and the upstream
//! request are both derived from the same parameter list, so anything sent
//! upstream is also part of the key.

use url::Url;

use crate::cache::CacheKey;
use crate::catalog::ListingFilters;
use crate::error::{ProxyError, Result};
use crate::upstream::UpstreamRequest;

// == List Type ==
/// Curated catalog lists served under `danh-sach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Series,
    Single,
    TvShows,
    Animation,
    Subtitled,
    Narrated,
    Dubbed,
}

impl ListType {
    const ALL: [ListType; 7] = [
        ListType::Series,
        ListType::Single,
        ListType::TvShows,
        ListType::Animation,
        ListType::Subtitled,
        ListType::Narrated,
        ListType::Dubbed,
    ];

    /// Slug used by the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Series => "phim-bo",
            ListType::Single => "phim-le",
            ListType::TvShows => "tv-shows",
            ListType::Animation => "hoat-hinh",
            ListType::Subtitled => "phim-vietsub",
            ListType::Narrated => "phim-thuyet-minh",
            ListType::Dubbed => "phim-long-tieng",
        }
    }

    /// Parses a list slug.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|list| list.as_str() == raw)
            .ok_or_else(|| ProxyError::Validation(format!("Unsupported list type: {}", raw)))
    }
}

// == Operation ==
/// A logical upstream call returning JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Recently updated movies
    NewReleases { page: u32 },
    /// Full detail of one movie
    MovieDetail { slug: String },
    /// Keyword search
    Search {
        keyword: String,
        filters: ListingFilters,
    },
    /// Movies in one genre
    Genre {
        slug: String,
        filters: ListingFilters,
    },
    /// Movies from one country
    Country {
        slug: String,
        filters: ListingFilters,
    },
    /// Movies released in one year
    Year { year: u16, filters: ListingFilters },
    /// Movies in a curated list
    Listing {
        list: ListType,
        filters: ListingFilters,
    },
    /// All genres
    GenreList,
    /// All countries
    CountryList,
}

/// Everything that identifies an operation, before it is turned into a key
/// or a request.
struct Parts {
    name: &'static str,
    upstream_path: &'static str,
    segments: Vec<String>,
    params: Vec<(&'static str, String)>,
}

impl Operation {
    /// Short operation name, used as the cache key prefix.
    pub fn name(&self) -> &'static str {
        self.parts().name
    }

    fn parts(&self) -> Parts {
        let (name, upstream_path, segments, params) = match self {
            Operation::NewReleases { page } => (
                "phim-moi",
                "danh-sach/phim-moi-cap-nhat",
                vec![],
                vec![("page", page.to_string())],
            ),
            Operation::MovieDetail { slug } => ("phim", "phim", vec![slug.clone()], vec![]),
            Operation::Search { keyword, filters } => {
                let mut params = filters.params();
                params.push(("keyword", keyword.clone()));
                ("tim-kiem", "v1/api/tim-kiem", vec![], params)
            }
            Operation::Genre { slug, filters } => (
                "the-loai",
                "v1/api/the-loai",
                vec![slug.clone()],
                filters.params(),
            ),
            Operation::Country { slug, filters } => (
                "quoc-gia",
                "v1/api/quoc-gia",
                vec![slug.clone()],
                filters.params(),
            ),
            Operation::Year { year, filters } => (
                "nam",
                "v1/api/nam",
                vec![year.to_string()],
                filters.params(),
            ),
            Operation::Listing { list, filters } => (
                "danh-sach",
                "v1/api/danh-sach",
                vec![list.as_str().to_string()],
                filters.params(),
            ),
            Operation::GenreList => ("the-loai", "the-loai", vec![], vec![]),
            Operation::CountryList => ("quoc-gia", "quoc-gia", vec![], vec![]),
        };

        Parts {
            name,
            upstream_path,
            segments,
            params,
        }
    }

    // == Cache Key ==
    /// Canonical key for this operation and its parameters.
    pub fn cache_key(&self) -> CacheKey {
        let parts = self.parts();
        parts
            .segments
            .iter()
            .fold(CacheKey::builder(parts.name), |builder, segment| {
                builder.segment(segment)
            })
            .params(parts.params)
    }

    // == Upstream Request ==
    /// Request to send to the catalog on a miss.
    pub fn upstream_request(&self) -> UpstreamRequest {
        let mut parts = self.parts();
        parts.params.sort();
        parts
            .segments
            .into_iter()
            .fold(UpstreamRequest::new(parts.upstream_path), |req, segment| {
                req.segment(segment)
            })
            .query(parts.params)
    }
}

// == Image Redirect ==
/// Redirect to the catalog's image transcoder for an original image URL.
///
/// The target is computed locally; the transcoder is only contacted by the
/// client following the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRedirect {
    original: String,
}

impl ImageRedirect {
    /// Accepts an absolute http(s) URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let original = raw.trim();
        let parsed = Url::parse(original).map_err(|e| {
            ProxyError::Validation(format!("Invalid image url '{}': {}", original, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProxyError::Validation(format!(
                "Image url must use http or https: {}",
                original
            )));
        }

        Ok(Self {
            original: original.to_string(),
        })
    }

    /// The original image URL as received.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Canonical key for this redirect.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::builder("image").params([("url", self.original.as_str())])
    }

    /// Builds `{endpoint}?url={original}` with the original form-encoded.
    pub fn target(&self, endpoint: &Url) -> Url {
        let mut target = endpoint.clone();
        target
            .query_pairs_mut()
            .clear()
            .append_pair("url", &self.original);
        target
    }
}
