//! Cursor based connection pagination.
//!
//! A request flows through four steps:
//!
//! 1. [`ArgumentValidator`] checks `first`/`after`/`last`/`before`
//! 2. [`map_direction`] turns sort order + traversal into a raw store sort
//! 3. [`WindowFetcher`] runs one over-fetching query against an
//!    [`OrderedStore`](crate::database::traits::OrderedStore)
//! 4. [`ConnectionAssembler`] trims the window and builds edges and page info
//!
//! [`Pager`] strings the steps together.

pub use arguments::{ArgumentValidator, LimitPolicy, ValidatedArguments};
pub use assembler::ConnectionAssembler;
pub use direction::{
    map_direction, Comparison, DirectionMapping, SortDirection, SortOrder, Traversal,
};
pub use pager::{Pager, PagerConfig, PagerConfigBuilder};
pub use types::{Connection, ConnectionArguments, Cursor, Edge, PageInfo};
pub use window::{CursorBound, FetchStrategy, WindowFetcher, WindowQuery, WindowSpec};

mod arguments;
mod assembler;
mod direction;
mod pager;
mod types;
mod window;
