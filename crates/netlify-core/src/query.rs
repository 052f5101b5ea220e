//! Query parameter composition for Netlify requests.

use std::fmt::Display;
use url::Url;

/// Ordered set of query parameter pairs attached to a [`crate::Request`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty set.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Shorthand for the `site_id` filter used by the environment variable endpoints.
    #[must_use]
    pub fn site_id(site_id: impl Display) -> Self {
        let mut params = Self::new();
        params.push("site_id", site_id);
        params
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Borrow the collected pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Append every pair to the URL's query string, form-encoded.
    ///
    /// Leaves the URL untouched when the set is empty, so no dangling `?` is produced.
    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
    }
}
