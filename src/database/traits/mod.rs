pub use read::OrderedStore;

mod read;
