//! Execution trait shared by the query builders.

use crate::client::GenericClient;
use crate::error::PagerResult;
use crate::qb::param::ParamList;
use crate::row::FromRow;
use tokio_postgres::Row;

/// A buildable, executable query.
///
/// `build` renders SQL together with the parameters it binds; the execution
/// helpers run that pair on any [`GenericClient`].
pub trait SqlQb: Sync {
    /// Build the SQL string and its bind parameters.
    fn build(&self) -> (String, ParamList);

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> String {
        self.build().0
    }

    /// Execute query and return all rows.
    fn query(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = PagerResult<Vec<Row>>> + Send {
        async move {
            let (sql, params) = self.build();
            conn.query(&sql, &params.as_refs()).await
        }
    }

    /// Execute query and return at most one row.
    fn query_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = PagerResult<Option<Row>>> + Send {
        async move {
            let (sql, params) = self.build();
            conn.query_opt(&sql, &params.as_refs()).await
        }
    }

    /// Execute query and return the first row.
    fn query_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = PagerResult<Row>> + Send {
        async move {
            let (sql, params) = self.build();
            conn.query_one(&sql, &params.as_refs()).await
        }
    }

    /// Execute query and map all rows to `T`.
    fn fetch_all<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = PagerResult<Vec<T>>> + Send {
        async move {
            let rows = self.query(conn).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute query and map at most one row to `T`.
    fn fetch_opt<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = PagerResult<Option<T>>> + Send {
        async move {
            let row = self.query_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }
    }

    /// Execute query and map the first row to `T`.
    fn fetch_one<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = PagerResult<T>> + Send {
        async move {
            let row = self.query_one(conn).await?;
            T::from_row(&row)
        }
    }
}
