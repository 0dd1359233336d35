use super::get_compressors;
use crate::database::mongodb::MongodbSource;
use crate::{PagerError, PagerResult};
use mongodb::options::{ClientOptions, Compressor, CountOptions, FindOptions};
use mongodb::Client;

#[derive(Default, Clone)]
pub struct MongodbSourceBuilder {
    database_name: Option<String>,
    client_options: Option<ClientOptions>,
    read_options: Option<FindOptions>,
    count_options: Option<CountOptions>,
    cursor_batch_size: Option<u32>,
    compressors: Option<Vec<Compressor>>,
}

impl MongodbSourceBuilder {
    pub fn new() -> MongodbSourceBuilder {
        MongodbSourceBuilder::default()
    }

    pub fn database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = Some(database_name.into());
        self
    }

    pub fn client_options(mut self, options: impl Into<Option<ClientOptions>>) -> Self {
        self.client_options = options.into();
        self
    }

    /// Base options for every window query. Sort and limit are always
    /// overwritten by the window itself.
    pub fn read_options(mut self, options: impl Into<Option<FindOptions>>) -> Self {
        self.read_options = options.into();
        self
    }

    pub fn count_options(mut self, options: impl Into<Option<CountOptions>>) -> Self {
        self.count_options = options.into();
        self
    }

    /// Set the MongoDB cursor batch size.
    ///
    /// Windows are small (page size plus one or two rows), so a batch only
    /// needs to cover the largest page a connection allows. If not specified
    /// the driver default is used.
    pub fn cursor_batch_size(mut self, batch_size: u32) -> Self {
        self.cursor_batch_size = Some(batch_size);
        self
    }

    /// Enable network compression, letting MongoDB negotiate the best
    /// supported algorithm with the server.
    pub fn enable_compression(mut self) -> Self {
        self.compressors = get_compressors();
        self
    }

    pub(crate) fn resolve_read_options(&self) -> FindOptions {
        let mut read_options = self.read_options.clone().unwrap_or_default();

        // Only set batch size if user hasn't explicitly configured it
        if read_options.batch_size.is_none() {
            read_options.batch_size = self.cursor_batch_size;
        }
        read_options
    }

    pub(crate) fn resolve_client_options(&self) -> PagerResult<ClientOptions> {
        let mut client_options = self.client_options.clone().ok_or_else(|| {
            PagerError::ConfigError("No client options provided for mongodb source database".into())
        })?;

        // Pagination requests are short and concurrent; size the pool to the host
        if client_options.max_pool_size.is_none() {
            let thread_count = num_cpus::get() as u32;
            client_options.max_pool_size = Some(std::cmp::max(thread_count + 5, 10));
        }
        if client_options.min_pool_size.is_none() {
            client_options.min_pool_size = Some(num_cpus::get() as u32);
        }

        if let Some(compressors) = &self.compressors {
            client_options.compressors = Some(compressors.clone());
        }

        Ok(client_options)
    }

    pub async fn build(self) -> PagerResult<MongodbSource> {
        let database_name = self.database_name.clone().ok_or_else(|| {
            PagerError::ConfigError("No database name provided for mongodb source database".into())
        })?;

        let client = Client::with_options(self.resolve_client_options()?)?;
        let db = client.database(database_name.as_str());

        Ok(MongodbSource::new(
            db,
            self.resolve_read_options(),
            self.count_options,
        ))
    }
}
