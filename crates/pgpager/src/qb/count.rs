//! Row counting over a query wrapped as a derived table.

use crate::client::GenericClient;
use crate::error::PagerResult;
use crate::qb::param::ParamList;
use crate::qb::select::SelectQb;
use crate::qb::traits::SqlQb;
use tokio_postgres::Row;

/// Default alias for the derived table a count runs over.
pub const COUNT_ALIAS: &str = "count__query__";

/// Column name the count is selected as.
pub const TOTAL_COLUMN: &str = "total";

/// `SELECT COUNT(*) AS total FROM (<inner>) AS <alias>`.
///
/// Counting the whole inner query keeps its filters, joins, GROUP BY and
/// HAVING in force: a grouped query counts groups, not matched rows.
#[derive(Clone, Debug)]
pub struct CountQb {
    inner: SelectQb,
    alias: String,
}

impl CountQb {
    /// Count the rows of `inner`.
    pub fn new(inner: SelectQb) -> Self {
        Self {
            inner,
            alias: COUNT_ALIAS.to_string(),
        }
    }

    /// Override the derived table alias.
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    /// The query being counted.
    pub fn inner(&self) -> &SelectQb {
        &self.inner
    }

    /// Execute and read the total; no row or no readable column counts as 0.
    pub async fn fetch_total(&self, conn: &impl GenericClient) -> PagerResult<i64> {
        let row = self.query_opt(conn).await?;
        Ok(row.as_ref().map(read_total).unwrap_or(0))
    }
}

impl SqlQb for CountQb {
    fn build(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let from = self.inner.as_subquery(&self.alias, &mut params);
        let sql = format!("SELECT COUNT(*) AS {TOTAL_COLUMN} FROM {from}");
        (sql, params)
    }
}

/// Read a count from `row`: `total`, then `TOTAL`, then the first column.
///
/// `COUNT(*)` is `bigint`; hand-written count queries may also return
/// `integer` or `text` (cast `numeric` with `::text`). Anything else, NULL
/// included, reads as 0.
pub fn read_total(row: &Row) -> i64 {
    if row.is_empty() {
        return 0;
    }
    let idx = ["total", "TOTAL"]
        .iter()
        .find_map(|name| row.columns().iter().position(|c| c.name() == *name))
        .unwrap_or(0);

    if let Ok(Some(v)) = row.try_get::<_, Option<i64>>(idx) {
        return v;
    }
    if let Ok(Some(v)) = row.try_get::<_, Option<i32>>(idx) {
        return i64::from(v);
    }
    if let Ok(Some(v)) = row.try_get::<_, Option<String>>(idx) {
        return v.trim().parse().unwrap_or(0);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_wraps_whole_query() {
        let inner = SelectQb::new("persons").between("id", 3i64, 8i64);
        let (sql, params) = CountQb::new(inner).build();
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS total FROM \
             (SELECT * FROM persons WHERE id BETWEEN $1 AND $2) AS count__query__"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_count_keeps_grouping() {
        let inner = SelectQb::new("persons")
            .select("EXTRACT(YEAR FROM signup_date)")
            .group_by("EXTRACT(YEAR FROM signup_date)");
        let sql = CountQb::new(inner).alias("years").to_sql();
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS total FROM \
             (SELECT EXTRACT(YEAR FROM signup_date) FROM persons \
             GROUP BY EXTRACT(YEAR FROM signup_date)) AS years"
        );
    }
}
