/*!
 * MongoDB Window Conversion Module
 *
 * Translates a planned connection window into the query document and find
 * options the driver understands.
 *
 * - Sort directions become `1` / `-1`
 * - Cursor bounds become `$gt` / `$gte` / `$lt` / `$lte` on the sort key
 * - Opaque cursors are encoded as the BSON type the sort key is stored as
 */

use crate::connection::{Comparison, Cursor, CursorBound, SortDirection, WindowSpec};
use crate::error::InvalidCursorError;
use crate::PagerResult;
use bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::FindOptions;
use serde_derive::{Deserialize, Serialize};

/// BSON type a collection's sort key is stored as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    #[default]
    ObjectId,
    String,
    Int64,
}

impl KeyType {
    /// Rebuilds the sort key value a cursor was made from.
    pub fn encode(&self, cursor: &Cursor) -> Result<Bson, InvalidCursorError> {
        match self {
            Self::ObjectId => cursor.decode(|s: &str| ObjectId::parse_str(s)).map(Bson::ObjectId),
            Self::String => Ok(Bson::String(cursor.as_str().to_string())),
            Self::Int64 => cursor.decode(str::parse::<i64>).map(Bson::Int64),
        }
    }
}

impl From<&SortDirection> for Bson {
    fn from(direction: &SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Bson::Int32(1),
            SortDirection::Desc => Bson::Int32(-1),
        }
    }
}

pub(crate) fn comparison_operator(bound: &CursorBound) -> &'static str {
    match (bound.comparison, bound.inclusive) {
        (Comparison::GreaterThan, false) => "$gt",
        (Comparison::GreaterThan, true) => "$gte",
        (Comparison::LessThan, false) => "$lt",
        (Comparison::LessThan, true) => "$lte",
    }
}

/// The caller's filter, narrowed by the cursor bound when there is one.
pub(crate) fn window_filter(spec: &WindowSpec<Document>, key_type: KeyType) -> PagerResult<Document> {
    let Some(bound) = &spec.bound else {
        return Ok(spec.filter.clone());
    };

    let key = key_type.encode(&bound.cursor)?;
    let bound_filter = doc! { spec.sort_key.as_str(): { comparison_operator(bound): key } };

    if spec.filter.is_empty() {
        Ok(bound_filter)
    } else {
        Ok(doc! { "$and": [spec.filter.clone(), bound_filter] })
    }
}

/// Base read options with the window's sort and limit applied.
pub(crate) fn window_options(base: &FindOptions, spec: &WindowSpec<Document>) -> FindOptions {
    let mut options = base.clone();
    options.sort = Some(doc! { spec.sort_key.as_str(): Bson::from(&spec.sort_direction) });
    options.limit = Some(i64::try_from(spec.limit).unwrap_or(i64::MAX));
    options
}

#[cfg(test)]
mod tests {
    //! Tests for window conversions
    //!
    //! These tests check the generated query documents and options without a
    //! running MongoDB server.

    use super::*;
    use crate::connection::{FetchStrategy, Traversal};
    use crate::PagerError;

    const OID: &str = "65f1c0de2a9b4c1d8e7f6a5b";

    /// Creates a backward, strict window over `_id` for testing
    fn spec(filter: Document, bound: Option<CursorBound>) -> WindowSpec<Document> {
        WindowSpec {
            filter,
            sort_key: "_id".into(),
            sort_direction: SortDirection::Desc,
            limit: 12,
            bound,
            page_size: 10,
            traversal: Traversal::Backward,
            strategy: FetchStrategy::StrictValidating,
        }
    }

    /// Creates a bound on the test ObjectId
    fn bound(comparison: Comparison, inclusive: bool) -> CursorBound {
        CursorBound {
            cursor: Cursor::from(OID),
            comparison,
            inclusive,
        }
    }

    /// Tests that every comparison and inclusivity pair has an operator
    #[test]
    fn test_comparison_operators() {
        assert_eq!(comparison_operator(&bound(Comparison::GreaterThan, false)), "$gt");
        assert_eq!(comparison_operator(&bound(Comparison::GreaterThan, true)), "$gte");
        assert_eq!(comparison_operator(&bound(Comparison::LessThan, false)), "$lt");
        assert_eq!(comparison_operator(&bound(Comparison::LessThan, true)), "$lte");
    }

    /// Tests that an unbounded window leaves the caller's filter alone
    #[test]
    fn test_filter_without_bound() {
        let filter = doc! { "organization": "org-a" };
        let query = window_filter(&spec(filter.clone(), None), KeyType::ObjectId)
            .expect("Filter should build");
        assert_eq!(query, filter, "Filter should pass through unchanged");
    }

    /// Tests that the bound alone is used when the caller has no filter
    #[test]
    fn test_bound_replaces_empty_filter() {
        let query = window_filter(
            &spec(Document::new(), Some(bound(Comparison::LessThan, true))),
            KeyType::ObjectId,
        )
        .expect("Filter should build");
        let oid = ObjectId::parse_str(OID).expect("Test id should parse");
        assert_eq!(query, doc! { "_id": { "$lte": oid } });
    }

    /// Tests that the bound is combined with the caller's filter under `$and`
    #[test]
    fn test_bound_anded_with_caller_filter() {
        let query = window_filter(
            &spec(doc! { "parentTag": "root" }, Some(bound(Comparison::GreaterThan, false))),
            KeyType::ObjectId,
        )
        .expect("Filter should build");
        let oid = ObjectId::parse_str(OID).expect("Test id should parse");
        assert_eq!(
            query,
            doc! { "$and": [ { "parentTag": "root" }, { "_id": { "$gt": oid } } ] }
        );
    }

    /// Tests that a cursor which is not an ObjectId is reported as an invalid cursor
    #[test]
    fn test_malformed_object_id_cursor() {
        let bad = CursorBound {
            cursor: Cursor::from("not-an-object-id"),
            comparison: Comparison::GreaterThan,
            inclusive: true,
        };
        let error = window_filter(&spec(Document::new(), Some(bad)), KeyType::ObjectId)
            .expect_err("Cursor is not a valid ObjectId");
        match error {
            PagerError::InvalidCursor(error) => assert_eq!(
                error.provided_cursor,
                Cursor::from("not-an-object-id"),
                "Error should carry the cursor as provided"
            ),
            other => panic!("Expected an invalid cursor error, got {other:?}"),
        }
    }

    /// Tests string and integer key encoding, including a forged integer cursor
    #[test]
    fn test_string_and_integer_keys() {
        let cursor = Cursor::from("42");
        assert_eq!(KeyType::String.encode(&cursor).expect("Strings always encode"), Bson::String("42".into()));
        assert_eq!(KeyType::Int64.encode(&cursor).expect("42 is an integer"), Bson::Int64(42));

        let forged = KeyType::Int64
            .encode(&Cursor::from("4x2"))
            .expect_err("4x2 is not an integer");
        assert_eq!(forged.provided_cursor, Cursor::from("4x2"));
    }

    /// Tests that window options keep the base options and add sort and limit
    #[test]
    fn test_options_carry_sort_and_limit() {
        let mut base = FindOptions::default();
        base.batch_size = Some(500);

        let options = window_options(&base, &spec(Document::new(), None));
        assert_eq!(options.sort, Some(doc! { "_id": -1 }), "Descending should sort as -1");
        assert_eq!(options.limit, Some(12), "Limit should include the over-fetch");
        assert_eq!(options.batch_size, Some(500), "Base options should survive");
    }
}
