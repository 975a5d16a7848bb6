//! Offset pagination with optional totals.
//!
//! [`Paginate::paginate`] turns a [`SelectQb`] into a [`Paginated`] query: the
//! builder gets the page's OFFSET/LIMIT, and when totals are wanted a
//! [`CountQb`] over a clone of the caller's query is prepared alongside.
//! Executing it returns a [`Page`] holding the rows and their [`Pagination`].
//!
//! Totals are counted when the query is length-aware, when the first page is
//! requested, or in from-start mode.
//!
//! ```ignore
//! use pgpager::{Paginate, PaginateOptions, qb};
//!
//! let page = qb::select("persons")
//!     .between("id", 3i64, 8i64)
//!     .order_by("id")
//!     .paginate(PaginateOptions::new().per_page(2))?
//!     .fetch::<Person>(&client)
//!     .await?;
//!
//! assert_eq!(page.pagination.total(), Some(6));
//! ```
//!
//! Passing a transaction as the client runs the page query and the count
//! query inside it, so both see the same snapshot.

mod config;
mod options;
mod result;

pub use config::{PaginateConfig, PostProcess};
pub use options::{DEFAULT_PER_PAGE, PageSlice, PaginateOptions};
pub use result::{Page, PageTotals, Pagination};

use crate::client::GenericClient;
use crate::error::PagerResult;
use crate::qb::{CountQb, SelectQb, SqlQb, read_total};
use crate::row::FromRow;
use tokio_postgres::Row;

/// Extension trait attaching pagination to a query builder.
pub trait Paginate: Sized {
    /// Slice this query to the page `options` select.
    ///
    /// Fails with [`PagerError::Validation`](crate::PagerError::Validation)
    /// before touching the query when the options cannot describe a page.
    fn paginate(self, options: PaginateOptions) -> PagerResult<Paginated>;
}

impl Paginate for SelectQb {
    fn paginate(self, options: PaginateOptions) -> PagerResult<Paginated> {
        Paginated::new(self, options)
    }
}

/// A page query and, when totals are wanted, its count query.
#[derive(Debug, Clone)]
pub struct Paginated {
    query: SelectQb,
    count: Option<CountQb>,
    slice: PageSlice,
    config: PaginateConfig,
}

impl Paginated {
    /// Validate `options` and prepare both queries.
    ///
    /// The count query is cloned from `query` before the page window is
    /// applied, with OFFSET and ORDER BY removed.
    pub fn new(query: SelectQb, options: PaginateOptions) -> PagerResult<Self> {
        options.validate()?;
        let slice = options.slice();

        let count = slice
            .fetch_totals
            .then(|| CountQb::new(query.clone().clear_offset().clear_order()));
        let query = query.offset(slice.offset).limit(slice.limit);

        Ok(Self {
            query,
            count,
            slice,
            config: PaginateConfig::default(),
        })
    }

    /// Use `config` when assembling the pagination.
    pub fn with_config(mut self, config: PaginateConfig) -> Self {
        self.config = config;
        self
    }

    /// The caller's query with the page window applied.
    pub fn page_query(&self) -> &SelectQb {
        &self.query
    }

    /// The count query, present only when totals will be fetched.
    pub fn count_query(&self) -> Option<&CountQb> {
        self.count.as_ref()
    }

    /// The window this page reads.
    pub fn slice(&self) -> PageSlice {
        self.slice
    }

    /// Execute and map rows with [`FromRow`].
    pub async fn fetch<T: FromRow>(&self, conn: &impl GenericClient) -> PagerResult<Page<T>> {
        self.fetch_with(conn, T::from_row).await
    }

    /// Execute and return raw rows.
    pub async fn fetch_rows(&self, conn: &impl GenericClient) -> PagerResult<Page<Row>> {
        let (rows, total) = self.execute(conn).await?;
        Ok(self.assemble(rows, total))
    }

    /// Execute and map rows with `map`.
    pub async fn fetch_with<T, F>(&self, conn: &impl GenericClient, map: F) -> PagerResult<Page<T>>
    where
        F: FnMut(&Row) -> PagerResult<T>,
    {
        let (rows, total) = self.execute(conn).await?;
        let data = rows.iter().map(map).collect::<PagerResult<Vec<T>>>()?;
        Ok(self.assemble(data, total))
    }

    /// Build the page envelope from already-fetched rows and count.
    pub fn assemble<T>(&self, data: Vec<T>, total: Option<i64>) -> Page<T> {
        let pagination = self.config.apply(self.slice.pagination(total, data.len()));

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "pgpager.sql",
            total = ?pagination.total(),
            per_page = pagination.per_page,
            current_page = pagination.current_page,
            from = pagination.from,
            to = pagination.to,
            "assembled page"
        );

        Page { data, pagination }
    }

    /// Run the page query and, if prepared, the count query on `conn`.
    ///
    /// Both are issued before either is awaited; on a single connection they
    /// are pipelined in order, inside the caller's transaction if `conn` is one.
    async fn execute(&self, conn: &impl GenericClient) -> PagerResult<(Vec<Row>, Option<i64>)> {
        let (sql, params) = self.query.build();
        let params_ref = params.as_refs();
        log_sql("paginate.page", &sql, params.len());

        let page = conn.query(&sql, &params_ref);
        futures_util::try_join!(page, self.count_total(conn))
    }

    async fn count_total(&self, conn: &impl GenericClient) -> PagerResult<Option<i64>> {
        let Some(count) = &self.count else {
            return Ok(None);
        };
        let (sql, params) = count.build();
        log_sql("paginate.count", &sql, params.len());

        let row = conn.query_opt(&sql, &params.as_refs()).await?;
        Ok(Some(row.as_ref().map(read_total).unwrap_or(0)))
    }
}

#[cfg(feature = "tracing")]
fn log_sql(tag: &str, sql: &str, param_count: usize) {
    tracing::debug!(target: "pgpager.sql", tag, param_count, sql = %sql);
}

#[cfg(not(feature = "tracing"))]
fn log_sql(_tag: &str, _sql: &str, _param_count: usize) {}
