use super::{
    map_direction, Comparison, Cursor, SortDirection, SortOrder, Traversal, ValidatedArguments,
};
use crate::database::traits::OrderedStore;
use crate::PagerResult;
use serde_derive::{Deserialize, Serialize};
use tracing::debug;

/// How a window is bounded and how much is over-fetched.
///
/// The two strategies are not interchangeable: only `StrictValidating`
/// detects a cursor whose row has disappeared or moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    /// Inclusive bound; the bound row must come back first and is checked
    /// against the cursor before being dropped. Fetches `limit + 2` with a
    /// cursor, `limit + 1` without.
    #[default]
    StrictValidating,
    /// Exclusive bound with no re-validation. Always fetches `limit + 1`.
    ClampedExclusive,
}

impl TryFrom<String> for FetchStrategy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "strict" | "strict-validating" => Ok(Self::StrictValidating),
            "clamped" | "clamped-exclusive" => Ok(Self::ClampedExclusive),
            other => Err(format!("{} is not a supported fetch strategy.", other)),
        }
    }
}

/// The cursor constraint applied to the sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorBound {
    pub cursor: Cursor,
    pub comparison: Comparison,
    pub inclusive: bool,
}

/// What the caller wants paginated: a store filter plus the key and order
/// the connection is sorted by.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowQuery<F> {
    pub filter: F,
    pub sort_key: String,
    pub sort_order: SortOrder,
}

impl<F> WindowQuery<F> {
    pub fn new(filter: F, sort_key: impl Into<String>) -> Self {
        Self {
            filter,
            sort_key: sort_key.into(),
            sort_order: SortOrder::Ascending,
        }
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// A fully resolved store query. Built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec<F> {
    pub filter: F,
    pub sort_key: String,
    pub sort_direction: SortDirection,
    /// Rows to request from the store, over-fetch included.
    pub limit: u64,
    pub bound: Option<CursorBound>,
    /// Rows the caller asked for.
    pub page_size: u64,
    pub traversal: Traversal,
    pub strategy: FetchStrategy,
}

impl<F> WindowSpec<F> {
    pub fn plan(
        strategy: FetchStrategy,
        query: WindowQuery<F>,
        arguments: &ValidatedArguments,
    ) -> Self {
        let mapping = map_direction(
            query.sort_order,
            arguments.traversal,
            arguments.cursor.as_ref(),
        );

        let bound = arguments
            .cursor
            .clone()
            .zip(mapping.comparison)
            .map(|(cursor, comparison)| CursorBound {
                cursor,
                comparison,
                inclusive: strategy == FetchStrategy::StrictValidating,
            });

        let over_fetch = match (strategy, &bound) {
            (FetchStrategy::StrictValidating, Some(_)) => 2,
            _ => 1,
        };

        Self {
            filter: query.filter,
            sort_key: query.sort_key,
            sort_direction: mapping.raw_sort_direction,
            limit: arguments.limit.saturating_add(over_fetch),
            bound,
            page_size: arguments.limit,
            traversal: arguments.traversal,
            strategy,
        }
    }
}

/// Runs the single store round trip for a planned window.
pub struct WindowFetcher;

impl WindowFetcher {
    /// Returns the raw over-fetched window; trimming and validation are left
    /// to the assembler. Store errors pass through untouched.
    pub async fn fetch<S>(spec: &WindowSpec<S::Filter>, store: &S) -> PagerResult<Vec<S::Row>>
    where
        S: OrderedStore + ?Sized,
    {
        debug!(
            sort_key = %spec.sort_key,
            sort_direction = %spec.sort_direction,
            limit = spec.limit,
            bound = ?spec.bound,
            "Fetching connection window"
        );

        let window = store.find(spec).await?;

        debug!(rows = window.len(), "Fetched connection window");
        Ok(window)
    }
}
