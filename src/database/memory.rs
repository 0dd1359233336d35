//! In-process ordered store over a vector of rows.
//!
//! Rows are keyed by a caller supplied function; cursors are parsed into the
//! key type with `FromStr`. Handy for tests and for connections over data
//! that is already in memory.

use crate::connection::{CursorBound, WindowSpec};
use crate::database::traits::OrderedStore;
use crate::PagerResult;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Row filter for a [`MemoryStore`].
pub struct Predicate<U>(Arc<dyn Fn(&U) -> bool + Send + Sync>);

impl<U> Predicate<U> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&U) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn all() -> Self
    where
        U: 'static,
    {
        Self(Arc::new(|_: &U| true))
    }

    pub fn matches(&self, row: &U) -> bool {
        (self.0)(row)
    }
}

impl<U> Clone for Predicate<U> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<U> fmt::Debug for Predicate<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

pub struct MemoryStore<U, K> {
    rows: RwLock<Vec<U>>,
    key: Arc<dyn Fn(&U) -> K + Send + Sync>,
    find_calls: AtomicUsize,
}

impl<U, K> MemoryStore<U, K>
where
    U: Clone + Send + Sync,
    K: Ord + FromStr,
    K::Err: fmt::Display,
{
    pub fn new<F>(key: F, rows: impl IntoIterator<Item = U>) -> Self
    where
        F: Fn(&U) -> K + Send + Sync + 'static,
    {
        Self {
            rows: RwLock::new(rows.into_iter().collect()),
            key: Arc::new(key),
            find_calls: AtomicUsize::new(0),
        }
    }

    pub async fn insert(&self, row: U) {
        self.rows.write().await.push(row);
    }

    /// Removes every row matching `predicate`, returning how many went.
    pub async fn remove<P>(&self, predicate: P) -> usize
    where
        P: Fn(&U) -> bool,
    {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| !predicate(row));
        before - rows.len()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// How many windows have been fetched from this store.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::Relaxed)
    }

    fn bound_key(&self, bound: &CursorBound) -> PagerResult<K> {
        Ok(bound.cursor.decode(str::parse::<K>)?)
    }
}

#[async_trait]
impl<U, K> OrderedStore for MemoryStore<U, K>
where
    U: Clone + Send + Sync,
    K: Ord + FromStr + Send + Sync,
    K::Err: fmt::Display,
{
    type Filter = Predicate<U>;
    type Row = U;

    async fn find(&self, spec: &WindowSpec<Self::Filter>) -> PagerResult<Vec<U>> {
        self.find_calls.fetch_add(1, Ordering::Relaxed);

        let bound = match &spec.bound {
            Some(bound) => Some((bound, self.bound_key(bound)?)),
            None => None,
        };

        let rows = self.rows.read().await;
        let mut window: Vec<(K, &U)> = rows
            .iter()
            .filter(|row| spec.filter.matches(row))
            .map(|row| ((self.key)(row), row))
            .filter(|(key, _)| match &bound {
                Some((bound, bound_key)) => bound.comparison.admits(key, bound_key, bound.inclusive),
                None => true,
            })
            .collect();

        window.sort_by(|(left, _), (right, _)| spec.sort_direction.order(left, right));

        let limit = usize::try_from(spec.limit).unwrap_or(usize::MAX);
        Ok(window
            .into_iter()
            .take(limit)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn count(&self, filter: &Self::Filter) -> PagerResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| filter.matches(row)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Comparison, Cursor, FetchStrategy, SortDirection, Traversal};
    use crate::PagerError;

    fn spec(direction: SortDirection, limit: u64, bound: Option<CursorBound>) -> WindowSpec<Predicate<i64>> {
        WindowSpec {
            filter: Predicate::all(),
            sort_key: "_id".into(),
            sort_direction: direction,
            limit,
            bound,
            page_size: limit,
            traversal: Traversal::Forward,
            strategy: FetchStrategy::StrictValidating,
        }
    }

    fn store() -> MemoryStore<i64, i64> {
        MemoryStore::new(|row: &i64| *row, [4, 1, 5, 3, 2])
    }

    #[tokio::test]
    async fn find_sorts_and_limits() {
        let rows = store()
            .find(&spec(SortDirection::Desc, 3, None))
            .await
            .expect("Find should succeed");
        assert_eq!(rows, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn find_applies_inclusive_and_exclusive_bounds() {
        let store = store();
        let bound = |inclusive| CursorBound {
            cursor: Cursor::from("3"),
            comparison: Comparison::GreaterThan,
            inclusive,
        };

        let inclusive = store
            .find(&spec(SortDirection::Asc, 10, Some(bound(true))))
            .await
            .expect("Find should succeed");
        assert_eq!(inclusive, vec![3, 4, 5]);

        let exclusive = store
            .find(&spec(SortDirection::Asc, 10, Some(bound(false))))
            .await
            .expect("Find should succeed");
        assert_eq!(exclusive, vec![4, 5]);
        assert_eq!(store.find_calls(), 2);
    }

    #[tokio::test]
    async fn unparseable_cursor_is_an_invalid_cursor() {
        let bound = CursorBound {
            cursor: Cursor::from("not-a-number"),
            comparison: Comparison::LessThan,
            inclusive: false,
        };
        let store = store();
        let error = store
            .find(&spec(SortDirection::Desc, 3, Some(bound)))
            .await
            .expect_err("Cursor should not parse as i64");
        match error {
            PagerError::InvalidCursor(error) => {
                assert_eq!(error.provided_cursor, Cursor::from("not-a-number"))
            }
            other => panic!("Expected an invalid cursor error, got {other:?}"),
        }
        assert_eq!(store.find_calls(), 1);
    }

    #[tokio::test]
    async fn count_and_remove_respect_filters() {
        let store = store();
        let even = Predicate::new(|row: &i64| row % 2 == 0);
        assert_eq!(store.count(&even).await.expect("Count should succeed"), 2);

        assert_eq!(store.remove(|row| *row == 4).await, 1);
        store.insert(6).await;
        assert_eq!(store.count(&even).await.expect("Count should succeed"), 2);
        assert_eq!(store.len().await, 5);
    }
}
