//! Relay connection values.
//!
//! Every value here is created for a single pagination call and dropped at
//! the end of it. The only thing that outlives a call is the cursor string the
//! client carries back.

use crate::error::InvalidCursorError;
use serde_derive::{Deserialize, Serialize};
use std::fmt::{self, Display};
use tracing::warn;

/// Opaque positional token.
///
/// A cursor is the string form of a unique, totally ordered key. It only has
/// meaning relative to the filter and sort key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Parses the cursor back into the store key it was built from.
    ///
    /// A cursor that does not parse was never handed out for this key, so it
    /// is reported the same way as a cursor whose row has gone.
    pub fn decode<K, E, F>(&self, decode: F) -> Result<K, InvalidCursorError>
    where
        F: FnOnce(&str) -> Result<K, E>,
        E: Display,
    {
        decode(&self.0).map_err(|error| {
            warn!(cursor = %self, %error, "Cursor does not decode to a store key");
            InvalidCursorError {
                provided_cursor: self.clone(),
            }
        })
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw `first`/`after`/`last`/`before` arguments as received from a caller.
///
/// Counts are signed so that negative input survives until validation and
/// can be reported as such.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionArguments {
    pub first: Option<i64>,
    pub after: Option<Cursor>,
    pub last: Option<i64>,
    pub before: Option<Cursor>,
}

impl ConnectionArguments {
    pub fn forward(first: i64, after: Option<Cursor>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Default::default()
        }
    }

    pub fn backward(last: i64, before: Option<Cursor>) -> Self {
        Self {
            last: Some(last),
            before,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: Cursor,
}

impl<T> Edge<T> {
    pub fn new(node: T, cursor: Cursor) -> Self {
        Self { node, cursor }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<T> Connection<T> {
    /// A fresh empty connection: no edges, both page flags false, no cursors.
    ///
    /// This is an ordinary terminal state (e.g. a client paging past the end),
    /// not an error.
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: None,
        }
    }

    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn cursors(&self) -> impl Iterator<Item = &Cursor> {
        self.edges.iter().map(|edge| &edge.cursor)
    }

    /// Converts every node while keeping cursors and page info untouched.
    pub fn map_nodes<N, F>(self, mut f: F) -> Connection<N>
    where
        F: FnMut(T) -> N,
    {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge::new(f(edge.node), edge.cursor))
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self::empty()
    }
}
