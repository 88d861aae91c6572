//! Cache Key Module
//!
//! Builds deterministic cache keys from an operation name, its path segments
//! and its query parameters.
//!
//! Key shape: `operation[:segment]*[?canonical-query]`, for example
//! `phim:ngoi-nha-nho-tren-thao-nguyen` or `tim-kiem?keyword=ma&page=1`.

use std::fmt;

use url::form_urlencoded;

// == Canonical Query ==
/// Serializes a parameter set independently of insertion order.
///
/// Empty values are dropped, the remaining pairs are sorted by name then
/// value and form-urlencoded. Two parameter sets holding the same pairs always
/// produce the same string.
pub fn canonical_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .filter(|(_, value)| !value.as_ref().is_empty())
        .map(|(name, value)| (name.as_ref().to_owned(), value.as_ref().to_owned()))
        .collect();
    pairs.sort();

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

// == Cache Key ==
/// Canonical identifier of one logical upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Starts a key for the named operation.
    pub fn builder(operation: &str) -> CacheKeyBuilder {
        CacheKeyBuilder {
            key: operation.to_owned(),
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Cache Key Builder ==
/// Appends path segments, then finishes with an optional parameter set.
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    key: String,
}

impl CacheKeyBuilder {
    /// Appends a path segment.
    ///
    /// Segments are form-encoded so a `:` or `?` inside a slug cannot collide
    /// with the key separators.
    pub fn segment(mut self, segment: &str) -> Self {
        self.key.push(':');
        self.key.extend(form_urlencoded::byte_serialize(segment.as_bytes()));
        self
    }

    /// Finishes the key with the canonical form of `params`.
    pub fn params<I, K, V>(self, params: I) -> CacheKey
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = canonical_query(params);
        let mut key = self.key;
        if !query.is_empty() {
            key.push('?');
            key.push_str(&query);
        }
        CacheKey(key)
    }

    /// Finishes the key without parameters.
    pub fn build(self) -> CacheKey {
        CacheKey(self.key)
    }
}
