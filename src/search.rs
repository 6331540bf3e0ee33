//! Search API support with pagination.
//!
//! Every entity type is searchable through the generic `search/{type}`
//! endpoint. A [`Search`] drives that endpoint one page at a time, or to
//! exhaustion via [`Search::find_all`].

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages fetched by [`Search::find_all`] (safety limit).
///
/// Termination is otherwise entirely server-driven via `moreItems`; the cap
/// guards against a server that never stops reporting more.
const MAX_PAGES: u32 = 1000;

/// How a [`SearchCondition`] value is matched against an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchingMethod {
    /// Field contains the value.
    Contains,
    /// Field starts with the value.
    #[serde(rename = "STARTSWITH")]
    StartsWith,
    /// Field equals the value exactly.
    Exact,
    /// Tag-path match, for hierarchical tags.
    #[serde(rename = "TAGPATH")]
    TagPath,
}

/// A single search condition. Multiple conditions on one search act as a
/// logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCondition {
    /// The entity field to match (e.g. `tags`, `status`, `id`).
    pub key: String,
    /// The value to search for.
    pub value: String,
    /// How the value is matched.
    pub matching_method: MatchingMethod,
}

impl SearchCondition {
    /// An exact-match condition.
    pub fn exact(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            matching_method: MatchingMethod::Exact,
        }
    }

    /// A contains-match condition.
    pub fn contains(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            matching_method: MatchingMethod::Contains,
        }
    }
}

/// A time window to search within, in epoch milliseconds. Only meaningful
/// for certain entity types (e.g. events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Earliest start time included, epoch millis.
    #[serde(rename = "earliestStartTimeEpochMillis")]
    pub start_time: i64,
    /// Latest start time included, epoch millis.
    #[serde(rename = "latestStartTimeEpochMillis")]
    pub end_time: i64,
}

impl TimeRange {
    /// The window covering `period_seconds` before `end_time_seconds`.
    /// An `end_time_seconds` of zero means now.
    ///
    /// # Errors
    ///
    /// Returns an error if `period_seconds` is negative.
    pub fn trailing(end_time_seconds: i64, period_seconds: i64) -> Result<Self> {
        if period_seconds < 0 {
            return Err(VantageError::InvalidInput(
                "time period must be a positive number".to_string(),
            ));
        }
        let end = if end_time_seconds == 0 {
            Utc::now().timestamp()
        } else {
            end_time_seconds
        };
        Ok(Self {
            start_time: (end - period_seconds) * 1000,
            end_time: end * 1000,
        })
    }
}

/// Parameters sent with each search page request.
///
/// If `query` is empty, all items of the searched type match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Conditions to match, ANDed together.
    #[serde(rename = "query")]
    pub conditions: Vec<SearchCondition>,

    /// Maximum results per page.
    pub limit: u32,

    /// Offset of the first result returned. An offset of 100 with a limit
    /// of 100 yields results 101-200.
    pub offset: u32,

    /// Optional time window.
    #[serde(rename = "timeRange", skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            time_range: None,
        }
    }
}

/// One page of search results.
///
/// Items are held as raw JSON and decoded on demand, so a single page type
/// serves every entity.
#[derive(Debug)]
pub struct SearchPage {
    items: Box<RawValue>,
    more_items: bool,
    next_offset: u32,
}

impl SearchPage {
    /// Decode the page's items into a fresh collection.
    pub fn items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        serde_json::from_str(self.items.get()).map_err(|source| VantageError::Decode {
            excerpt: crate::rest::excerpt(self.items.get().as_bytes()),
            source,
        })
    }

    /// The raw JSON of the page's items.
    pub fn items_raw(&self) -> &RawValue {
        &self.items
    }

    /// Whether the server reported further items beyond this page.
    pub fn more_items(&self) -> bool {
        self.more_items
    }

    /// The offset for the next page, or 0 if this was the last page.
    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }
}

#[derive(Deserialize)]
struct PageBody {
    items: Box<RawValue>,
    #[serde(rename = "moreItems", default)]
    more_items: bool,
}

/// A search against the search API for one entity type.
///
/// # Example
///
/// ```no_run
/// use vantageapi::{Search, SearchCondition, VantageClient};
/// use vantageapi::Alert;
///
/// # async fn example(client: &VantageClient) -> vantageapi::Result<()> {
/// let snoozed: Vec<Alert> = Search::new("alert")
///     .conditions(&[SearchCondition::exact("status", "SNOOZED")])
///     .find_all(client)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Search {
    entity_type: String,
    params: SearchParams,
    deleted: bool,
}

impl Search {
    /// Start a search for the given entity type (`alert`, `dashboard`,
    /// `event`, `extlink`, ...).
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            params: SearchParams::default(),
            deleted: false,
        }
    }

    /// Set the search conditions. The slice is copied; later mutation of
    /// the caller's conditions does not affect this search.
    #[must_use]
    pub fn conditions(mut self, conditions: &[SearchCondition]) -> Self {
        self.params.conditions = conditions.to_vec();
        self
    }

    /// Override the page size (default 100). A limit of 0 is clamped to 1:
    /// a zero-size page could never advance the offset, so [`find_all`]
    /// would request the same empty page forever.
    ///
    /// [`find_all`]: Search::find_all
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.params.limit = limit.max(1);
        self
    }

    /// Set the starting offset. [`Search::find_all`] advances it per page.
    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.params.offset = offset;
        self
    }

    /// Restrict results to the given time window.
    #[must_use]
    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.params.time_range = Some(range);
        self
    }

    /// Search the trash (`search/{type}/deleted`) instead of live items.
    #[must_use]
    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    /// The current search parameters.
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    fn path(&self) -> String {
        if self.deleted {
            format!("search/{}/deleted", self.entity_type)
        } else {
            format!("search/{}", self.entity_type)
        }
    }

    /// Fetch a single page at the current offset.
    pub async fn execute_page(&self, client: &dyn ApiTransport) -> Result<SearchPage> {
        let body: PageBody = RestCall::post(self.path())
            .payload(&self.params)?
            .fetch(client)
            .await?;

        let next_offset = if body.more_items {
            self.params.offset + self.params.limit
        } else {
            0
        };
        Ok(SearchPage {
            items: body.items,
            more_items: body.more_items,
            next_offset,
        })
    }

    /// Fetch pages until the server reports no more items, accumulating
    /// every item.
    ///
    /// Pages are fetched strictly in increasing offset order; page *n*
    /// (0-indexed) requests `offset == limit * n`. Each page is decoded
    /// into a page-local collection and appended to the accumulator, so a
    /// failed page never corrupts previously decoded items. Any page error
    /// aborts the whole search, and partial contents must not be trusted by
    /// the caller on error.
    pub async fn find_all<T: DeserializeOwned>(
        mut self,
        client: &dyn ApiTransport,
    ) -> Result<Vec<T>> {
        let mut results: Vec<T> = Vec::new();
        let mut pages = 0u32;
        loop {
            let page = self.execute_page(client).await?;
            let mut page_items: Vec<T> = page.items()?;
            results.append(&mut page_items);

            if !page.more_items() {
                self.params.offset = 0;
                break;
            }
            self.params.offset = page.next_offset();

            pages += 1;
            if pages >= MAX_PAGES {
                tracing::warn!(
                    entity_type = %self.entity_type,
                    "reached pagination limit of {MAX_PAGES} pages, stopping"
                );
                break;
            }
        }
        Ok(results)
    }
}
