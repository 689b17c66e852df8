use axum::{
    extract::{Query, rejection::QueryRejection},
    http::Uri,
};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{SearchQuery, SortOrder};

/// Path of the search page whose query string mirrors the store.
pub const SEARCH_PATH: &str = "/search";

/// SearchParams
///
/// Query parameters of a `/search` location, percent-decoded.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    /// Search keyword.
    pub q: Option<String>,
    /// Tag filter.
    pub tag: Option<String>,
    /// `comprehensive` (default), `latest` or `hottest`.
    pub sort: Option<String>,
}

/// SearchStore
///
/// Search keyword, tag and sort order, kept in lockstep with the visible
/// `/search?...` location. The location is always rebuilt from the state, so
/// after any successful update `q` and the keyword agree.
#[derive(Default)]
pub struct SearchStore {
    query: Mutex<SearchQuery>,
}

pub type SearchStoreState = Arc<SearchStore>;

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> SearchQuery {
        self.query.lock().clone()
    }

    pub fn keyword(&self) -> String {
        self.query.lock().keyword.clone()
    }

    pub fn location(&self) -> String {
        location_for(&self.query.lock())
    }

    /// set_keyword
    ///
    /// Trims the input. Empty or whitespace-only input changes nothing and
    /// returns `false`.
    pub fn set_keyword(&self, input: &str) -> bool {
        let keyword = input.trim();
        if keyword.is_empty() {
            return false;
        }
        let mut query = self.query.lock();
        if query.keyword == keyword {
            return false;
        }
        query.keyword = keyword.to_string();
        tracing::debug!(keyword = %query.keyword, "search keyword updated");
        true
    }

    /// An empty or whitespace tag clears the filter.
    pub fn set_tag(&self, tag: Option<&str>) -> bool {
        let tag = tag.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
        let mut query = self.query.lock();
        if query.tag == tag {
            return false;
        }
        query.tag = tag;
        true
    }

    pub fn set_sort(&self, sort: SortOrder) -> bool {
        let mut query = self.query.lock();
        if query.sort == sort {
            return false;
        }
        query.sort = sort;
        true
    }

    pub fn clear(&self) {
        *self.query.lock() = SearchQuery::default();
    }

    /// sync_from_query
    ///
    /// URL-to-store direction, fed from already-decoded query parameters.
    /// A whitespace-only `q` reads as no keyword; an unknown sort falls back
    /// to the default.
    pub fn sync_from_query(&self, q: Option<&str>, tag: Option<&str>, sort: Option<&str>) {
        let next = SearchQuery {
            keyword: q.map(str::trim).unwrap_or_default().to_string(),
            tag: tag
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            sort: sort.and_then(|s| s.parse().ok()).unwrap_or_default(),
        };
        *self.query.lock() = next;
    }

    /// sync_from_uri
    ///
    /// URL-to-store direction for a request URI. A malformed query string is
    /// rejected and leaves the store untouched.
    pub fn sync_from_uri(&self, uri: &Uri) -> Result<(), QueryRejection> {
        let Query(params) = Query::<SearchParams>::try_from_uri(uri)?;
        self.sync_from_query(
            params.q.as_deref(),
            params.tag.as_deref(),
            params.sort.as_deref(),
        );
        Ok(())
    }

    /// Syncs from a raw location such as `/search?q=rust&sort=latest`.
    /// Returns `false`, changing nothing, when the location cannot be parsed.
    pub fn sync_from_location(&self, location: &str) -> bool {
        let synced = location
            .parse::<Uri>()
            .map_err(|e| e.to_string())
            .and_then(|uri| self.sync_from_uri(&uri).map_err(|e| e.body_text()));
        match synced {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(location = %location, "search: ignoring unparsable location: {}", e);
                false
            }
        }
    }
}

/// location_for
///
/// `/search` plus the non-default parameters of `query`, percent-encoded.
pub fn location_for(query: &SearchQuery) -> String {
    let mut params = Vec::new();
    if !query.keyword.is_empty() {
        params.push(format!("q={}", urlencoding::encode(&query.keyword)));
    }
    if let Some(tag) = &query.tag {
        params.push(format!("tag={}", urlencoding::encode(tag)));
    }
    if query.sort != SortOrder::default() {
        params.push(format!("sort={}", query.sort));
    }

    if params.is_empty() {
        SEARCH_PATH.to_string()
    } else {
        format!("{}?{}", SEARCH_PATH, params.join("&"))
    }
}
