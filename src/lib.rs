mod error;
pub mod connection;
pub mod database;

pub use connection::{
    Connection, ConnectionArguments, Cursor, Edge, FetchStrategy, LimitPolicy, PageInfo, Pager,
    PagerConfig, SortOrder, WindowQuery,
};
pub use database::traits::OrderedStore;
pub use error::{
    ArgumentErrorKind, ArgumentErrors, ArgumentField, InvalidCursorError, PagerError,
    PagerResult, PaginationArgumentError,
};
