pub use conversions::KeyType;
use mongodb::options::Compressor;
pub use source::{MongodbCollectionStore, MongodbSource};
pub use source_builder::MongodbSourceBuilder;

pub mod conversions;
pub mod source;
pub mod source_builder;

/// Wire compressors offered to the server, most preferred first.
///
/// Windows are small, so the server is free to pick whichever it supports.
pub(crate) fn get_compressors() -> Option<Vec<Compressor>> {
    Some(vec![
        Compressor::Zstd { level: None },
        Compressor::Zlib { level: None },
        Compressor::Snappy,
    ])
}
