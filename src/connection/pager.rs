use super::{
    ArgumentValidator, Connection, ConnectionArguments, ConnectionAssembler, Cursor,
    FetchStrategy, LimitPolicy, ValidatedArguments, WindowFetcher, WindowQuery, WindowSpec,
};
use crate::database::traits::OrderedStore;
use crate::error::ArgumentErrors;
use crate::PagerResult;
use serde_derive::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    pub max_limit: u64,
    pub limit_policy: LimitPolicy,
    pub strategy: FetchStrategy,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            max_limit: 32,
            limit_policy: LimitPolicy::Reject,
            strategy: FetchStrategy::StrictValidating,
        }
    }
}

impl PagerConfig {
    pub fn builder() -> PagerConfigBuilder {
        PagerConfigBuilder::new()
    }

    /// Exclusive single-bound windows with oversized pages clamped, as used
    /// by feeds that do not need stale-cursor detection.
    pub fn clamped() -> Self {
        Self {
            limit_policy: LimitPolicy::Clamp,
            strategy: FetchStrategy::ClampedExclusive,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct PagerConfigBuilder {
    config: PagerConfig,
}

impl PagerConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn max_limit(mut self, max_limit: impl Into<u64>) -> Self {
        self.config.max_limit = max_limit.into();
        self
    }

    pub fn limit_policy(mut self, policy: impl Into<LimitPolicy>) -> Self {
        self.config.limit_policy = policy.into();
        self
    }

    pub fn strategy(mut self, strategy: impl Into<FetchStrategy>) -> Self {
        self.config.strategy = strategy.into();
        self
    }

    pub fn build(self) -> PagerConfig {
        self.config
    }
}

/// Validates arguments, fetches one window and assembles a connection.
///
/// A pager holds configuration only, so one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager {
    config: PagerConfig,
}

impl Pager {
    pub fn new(config: PagerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn validator(&self) -> ArgumentValidator {
        ArgumentValidator::new(self.config.max_limit, self.config.limit_policy)
    }

    /// All argument problems at once, for field-scoped error reporting.
    pub fn validate_all(
        &self,
        arguments: &ConnectionArguments,
    ) -> Result<ValidatedArguments, ArgumentErrors> {
        self.validator().validate_all(arguments)
    }

    #[instrument(
        skip_all,
        fields(
            strategy = ?self.config.strategy,
            sort_key = %query.sort_key,
            first = ?arguments.first,
            last = ?arguments.last,
        )
    )]
    pub async fn paginate<S, T, N, C>(
        &self,
        store: &S,
        query: WindowQuery<S::Filter>,
        arguments: &ConnectionArguments,
        get_node: N,
        get_cursor: C,
    ) -> PagerResult<Connection<T>>
    where
        S: OrderedStore + ?Sized,
        N: FnMut(S::Row) -> T,
        C: Fn(&T) -> Cursor,
    {
        let validated = self.validator().validate(arguments)?;
        self.fetch_and_assemble(store, query, &validated, get_node, get_cursor)
            .await
    }

    /// Same as [`Pager::paginate`], with the number of rows matching the
    /// filter attached as `total_count`.
    pub async fn paginate_with_total_count<S, T, N, C>(
        &self,
        store: &S,
        query: WindowQuery<S::Filter>,
        arguments: &ConnectionArguments,
        get_node: N,
        get_cursor: C,
    ) -> PagerResult<Connection<T>>
    where
        S: OrderedStore + ?Sized,
        S::Filter: Clone,
        N: FnMut(S::Row) -> T,
        C: Fn(&T) -> Cursor,
    {
        let validated = self.validator().validate(arguments)?;
        let filter = query.filter.clone();

        let (connection, total_count) = futures::try_join!(
            self.fetch_and_assemble(store, query, &validated, get_node, get_cursor),
            store.count(&filter),
        )?;

        Ok(connection.with_total_count(total_count))
    }

    /// Fetch and assemble for arguments that were validated by the caller.
    pub async fn fetch_and_assemble<S, T, N, C>(
        &self,
        store: &S,
        query: WindowQuery<S::Filter>,
        arguments: &ValidatedArguments,
        get_node: N,
        get_cursor: C,
    ) -> PagerResult<Connection<T>>
    where
        S: OrderedStore + ?Sized,
        N: FnMut(S::Row) -> T,
        C: Fn(&T) -> Cursor,
    {
        let spec = WindowSpec::plan(self.config.strategy, query, arguments);
        let window = WindowFetcher::fetch(&spec, store).await?;
        Ok(ConnectionAssembler::assemble(
            window, &spec, get_node, get_cursor,
        )?)
    }
}
