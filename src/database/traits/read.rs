use crate::connection::WindowSpec;
use crate::PagerResult;
use async_trait::async_trait;

/// The ordered data store a connection is paginated over.
///
/// Implementations return rows in exactly the order and quantity the window
/// asks for and apply no filtering beyond `spec.filter` and `spec.bound`.
/// Retries and timeouts belong here, not in the pager.
#[async_trait]
pub trait OrderedStore: Send + Sync {
    type Filter: Send + Sync;
    type Row: Send;

    /// Up to `spec.limit` rows matching the filter and bound, sorted by
    /// `spec.sort_key` in `spec.sort_direction`.
    async fn find(&self, spec: &WindowSpec<Self::Filter>) -> PagerResult<Vec<Self::Row>>;

    /// Number of rows matching `filter`, ignoring any cursor.
    async fn count(&self, filter: &Self::Filter) -> PagerResult<u64>;
}
