use super::Cursor;
use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;

/// Logical order of the connection as the caller sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Which way through the connection a request moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    /// `first` / `after`
    #[default]
    Forward,
    /// `last` / `before`
    Backward,
}

/// Direction sent to the store for the actual query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl SortDirection {
    /// Orders two keys the way a store sorting in this direction would.
    pub fn order<K: Ord + ?Sized>(&self, left: &K, right: &K) -> Ordering {
        match self {
            Self::Asc => left.cmp(right),
            Self::Desc => right.cmp(left),
        }
    }
}

/// Comparison applied between a row's sort key and the bound cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

impl Comparison {
    /// Whether `key` passes this comparison against `bound`.
    pub fn admits<K: Ord + ?Sized>(&self, key: &K, bound: &K, inclusive: bool) -> bool {
        match (self, key.cmp(bound)) {
            (_, Ordering::Equal) => inclusive,
            (Self::GreaterThan, ordering) => ordering == Ordering::Greater,
            (Self::LessThan, ordering) => ordering == Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionMapping {
    /// `None` when there is no cursor to compare against.
    pub comparison: Option<Comparison>,
    pub raw_sort_direction: SortDirection,
}

/// Resolves a logical sort order and a traversal into the comparison and raw
/// sort direction a store query needs.
///
/// | sort order | traversal | comparison | raw direction |
/// |------------|-----------|------------|---------------|
/// | Ascending  | Forward   | `>`        | asc           |
/// | Ascending  | Backward  | `<`        | desc          |
/// | Descending | Forward   | `<`        | desc          |
/// | Descending | Backward  | `>`        | asc           |
pub fn map_direction(
    sort_order: SortOrder,
    traversal: Traversal,
    cursor: Option<&Cursor>,
) -> DirectionMapping {
    let (comparison, raw_sort_direction) = match (sort_order, traversal) {
        (SortOrder::Ascending, Traversal::Forward) => (Comparison::GreaterThan, SortDirection::Asc),
        (SortOrder::Ascending, Traversal::Backward) => (Comparison::LessThan, SortDirection::Desc),
        (SortOrder::Descending, Traversal::Forward) => (Comparison::LessThan, SortDirection::Desc),
        (SortOrder::Descending, Traversal::Backward) => {
            (Comparison::GreaterThan, SortDirection::Asc)
        }
    };

    DirectionMapping {
        comparison: cursor.map(|_| comparison),
        raw_sort_direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table() {
        let cursor = Cursor::from("5");
        let cases = [
            (SortOrder::Ascending, Traversal::Forward, Comparison::GreaterThan, SortDirection::Asc),
            (SortOrder::Ascending, Traversal::Backward, Comparison::LessThan, SortDirection::Desc),
            (SortOrder::Descending, Traversal::Forward, Comparison::LessThan, SortDirection::Desc),
            (SortOrder::Descending, Traversal::Backward, Comparison::GreaterThan, SortDirection::Asc),
        ];

        for (sort_order, traversal, comparison, direction) in cases {
            let mapping = map_direction(sort_order, traversal, Some(&cursor));
            assert_eq!(mapping.comparison, Some(comparison), "{sort_order:?}/{traversal:?}");
            assert_eq!(mapping.raw_sort_direction, direction, "{sort_order:?}/{traversal:?}");
        }
    }

    #[test]
    fn missing_cursor_skips_comparison_but_keeps_direction() {
        let mapping = map_direction(SortOrder::Descending, Traversal::Backward, None);
        assert_eq!(mapping.comparison, None);
        assert_eq!(mapping.raw_sort_direction, SortDirection::Asc);
    }

    #[test]
    fn comparison_respects_inclusivity() {
        assert!(Comparison::GreaterThan.admits(&3, &3, true));
        assert!(!Comparison::GreaterThan.admits(&3, &3, false));
        assert!(Comparison::GreaterThan.admits(&4, &3, false));
        assert!(!Comparison::LessThan.admits(&4, &3, true));
        assert!(Comparison::LessThan.admits(&2, &3, false));
    }

    #[test]
    fn sort_direction_orders_keys() {
        assert_eq!(SortDirection::Asc.order(&1, &2), Ordering::Less);
        assert_eq!(SortDirection::Desc.order(&1, &2), Ordering::Greater);
        assert_eq!(SortDirection::Desc.to_string(), "desc");
    }
}
