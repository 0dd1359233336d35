use crate::connection::WindowSpec;
use crate::database::mongodb::{
    conversions::{window_filter, window_options, KeyType},
    source_builder::MongodbSourceBuilder,
};
use crate::database::traits::OrderedStore;
use crate::PagerResult;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{bson::Document, options::{CountOptions, FindOptions}, Database};
use serde::de::DeserializeOwned;

pub struct MongodbSource {
    db: Database,
    read_options: FindOptions,
    count_options: Option<CountOptions>,
}

impl MongodbSource {
    pub fn builder() -> MongodbSourceBuilder {
        MongodbSourceBuilder::new()
    }

    pub(crate) fn new(
        db: Database,
        read_options: FindOptions,
        count_options: Option<CountOptions>,
    ) -> Self {
        Self {
            db,
            read_options,
            count_options,
        }
    }

    /// An ordered store over one collection, keyed by ObjectId cursors.
    pub fn collection<T>(&self, collection_name: &str) -> MongodbCollectionStore<T>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        MongodbCollectionStore {
            collection: self.db.collection::<T>(collection_name),
            read_options: self.read_options.clone(),
            count_options: self.count_options.clone(),
            key_type: KeyType::default(),
        }
    }
}

pub struct MongodbCollectionStore<T: Send + Sync> {
    collection: mongodb::Collection<T>,
    read_options: FindOptions,
    count_options: Option<CountOptions>,
    key_type: KeyType,
}

impl<T: Send + Sync> MongodbCollectionStore<T> {
    /// How cursors are encoded before being compared with the sort key.
    pub fn key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

#[async_trait]
impl<T> OrderedStore for MongodbCollectionStore<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    type Filter = Document;
    type Row = T;

    async fn find(&self, spec: &WindowSpec<Self::Filter>) -> PagerResult<Vec<T>> {
        let query = window_filter(spec, self.key_type)?;
        let options = window_options(&self.read_options, spec);

        let documents = self
            .collection
            .find(query)
            .with_options(options)
            .await?
            .try_collect()
            .await?;
        Ok(documents)
    }

    async fn count(&self, filter: &Self::Filter) -> PagerResult<u64> {
        let total_documents = self
            .collection
            .count_documents(filter.clone())
            .with_options(self.count_options.clone())
            .await?;
        Ok(total_documents)
    }
}
