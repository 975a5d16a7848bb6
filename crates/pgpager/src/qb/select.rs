//! SELECT query builder.

use crate::client::GenericClient;
use crate::error::PagerResult;
use crate::qb::count::CountQb;
use crate::qb::expr::{Expr, ExprGroup};
use crate::qb::param::ParamList;
use crate::qb::traits::SqlQb;
use tokio_postgres::types::ToSql;

/// SELECT query builder with expression-based WHERE/HAVING.
///
/// Column lists, joins, grouping and ordering are SQL fragments written by the
/// caller; only values go through bind parameters.
#[derive(Clone, Debug)]
pub struct SelectQb {
    /// Table or FROM expression
    from_expr: String,
    /// SELECT DISTINCT
    distinct: bool,
    /// SELECT columns (default ["*"])
    select_cols: Vec<String>,
    /// JOIN clauses
    join_clauses: Vec<String>,
    where_group: ExprGroup,
    /// GROUP BY expressions
    group_by: Vec<String>,
    having_group: ExprGroup,
    /// ORDER BY clauses
    order_clauses: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectQb {
    /// Create a new SELECT query builder for a table.
    pub fn new(table: &str) -> Self {
        Self::from(table)
    }

    /// Create a SELECT query builder with a custom FROM expression
    /// (aliases, already-rendered subqueries).
    pub fn from(from_expr: &str) -> Self {
        Self {
            from_expr: from_expr.to_string(),
            distinct: false,
            select_cols: vec!["*".to_string()],
            join_clauses: Vec::new(),
            where_group: ExprGroup::new(),
            group_by: Vec::new(),
            having_group: ExprGroup::new(),
            order_clauses: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ==================== SELECT columns ====================

    /// Set SELECT columns (string form, supports complex expressions).
    pub fn select(mut self, cols: &str) -> Self {
        self.select_cols = vec![cols.to_string()];
        self
    }

    /// Set SELECT columns (array form).
    pub fn select_cols(mut self, cols: &[&str]) -> Self {
        self.select_cols = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Append one SELECT column, replacing the default `*`.
    pub fn add_select(mut self, col: &str) -> Self {
        if self.select_cols.len() == 1 && self.select_cols[0] == "*" {
            self.select_cols.clear();
        }
        self.select_cols.push(col.to_string());
        self
    }

    /// Emit `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== JOIN ====================

    /// Add INNER JOIN.
    pub fn inner_join(self, table: &str, on: &str) -> Self {
        self.join("INNER JOIN", table, on)
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.join("LEFT JOIN", table, on)
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, table: &str, on: &str) -> Self {
        self.join("RIGHT JOIN", table, on)
    }

    /// Add FULL OUTER JOIN.
    pub fn full_join(self, table: &str, on: &str) -> Self {
        self.join("FULL OUTER JOIN", table, on)
    }

    fn join(mut self, kind: &str, table: &str, on: &str) -> Self {
        self.join_clauses.push(format!("{kind} {table} ON {on}"));
        self
    }

    // ==================== WHERE conditions ====================

    /// Add WHERE: column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::eq(column, value))
    }

    /// Add WHERE: column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::ne(column, value))
    }

    /// Add WHERE: column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::gt(column, value))
    }

    /// Add WHERE: column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::gte(column, value))
    }

    /// Add WHERE: column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::lt(column, value))
    }

    /// Add WHERE: column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::lte(column, value))
    }

    /// Add WHERE: column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(self, column: &str, pattern: T) -> Self {
        self.and_expr(Expr::like(column, pattern))
    }

    /// Add WHERE: column ILIKE pattern
    pub fn ilike<T: ToSql + Send + Sync + 'static>(self, column: &str, pattern: T) -> Self {
        self.and_expr(Expr::ilike(column, pattern))
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(self, column: &str) -> Self {
        self.and_expr(Expr::is_null(column))
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(self, column: &str) -> Self {
        self.and_expr(Expr::is_not_null(column))
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<T: ToSql + Send + Sync + 'static>(self, column: &str, values: Vec<T>) -> Self {
        self.and_expr(Expr::in_list(column, values))
    }

    /// Add WHERE: column NOT IN (values...)
    pub fn not_in<T: ToSql + Send + Sync + 'static>(self, column: &str, values: Vec<T>) -> Self {
        self.and_expr(Expr::not_in(column, values))
    }

    /// Add WHERE: column BETWEEN from AND to
    pub fn between<T: ToSql + Send + Sync + 'static>(self, column: &str, from: T, to: T) -> Self {
        self.and_expr(Expr::between(column, from, to))
    }

    /// Add WHERE: column NOT BETWEEN from AND to
    pub fn not_between<T: ToSql + Send + Sync + 'static>(
        self,
        column: &str,
        from: T,
        to: T,
    ) -> Self {
        self.and_expr(Expr::not_between(column, from, to))
    }

    /// Add a raw WHERE condition without params.
    ///
    /// Parenthesized when other conditions are present.
    pub fn raw(self, sql: &str) -> Self {
        self.and_expr(Expr::raw(sql))
    }

    /// Add a WHERE condition with `?` placeholders, parenthesized like [`raw`](Self::raw).
    pub fn where_template<T: ToSql + Send + Sync + 'static>(
        self,
        sql: &str,
        values: Vec<T>,
    ) -> Self {
        self.and_expr(Expr::template(sql, values))
    }

    /// Add a custom expression.
    pub fn and_expr(mut self, expr: Expr) -> Self {
        self.where_group.push(expr);
        self
    }

    // ==================== Optional value helpers ====================

    /// Add WHERE if value is Some: column = value
    pub fn eq_opt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Add WHERE if value is Some: column ILIKE pattern
    pub fn ilike_opt<T: ToSql + Send + Sync + 'static>(
        self,
        column: &str,
        pattern: Option<T>,
    ) -> Self {
        match pattern {
            Some(p) => self.ilike(column, p),
            None => self,
        }
    }

    /// Add WHERE if value is Some: column >= value
    pub fn gte_opt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.gte(column, v),
            None => self,
        }
    }

    /// Add WHERE if value is Some: column <= value
    pub fn lte_opt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.lte(column, v),
            None => self,
        }
    }

    /// Add WHERE if values is Some and non-empty: column IN (values...)
    pub fn in_opt<T: ToSql + Send + Sync + 'static>(
        self,
        column: &str,
        values: Option<Vec<T>>,
    ) -> Self {
        match values {
            Some(v) if !v.is_empty() => self.in_list(column, v),
            _ => self,
        }
    }

    // ==================== Grouping ====================

    /// Append GROUP BY expressions (columns or raw SQL such as
    /// `EXTRACT(YEAR FROM signup_date)`).
    pub fn group_by(mut self, clause: &str) -> Self {
        self.group_by.push(clause.to_string());
        self
    }

    /// Append several GROUP BY expressions.
    pub fn group_by_cols(mut self, cols: &[&str]) -> Self {
        self.group_by.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add HAVING: expr = value
    pub fn having_eq<T: ToSql + Send + Sync + 'static>(mut self, expr: &str, value: T) -> Self {
        self.having_group.push(Expr::eq(expr, value));
        self
    }

    /// Add HAVING: expr > value
    pub fn having_gt<T: ToSql + Send + Sync + 'static>(mut self, expr: &str, value: T) -> Self {
        self.having_group.push(Expr::gt(expr, value));
        self
    }

    /// Add HAVING: expr >= value
    pub fn having_gte<T: ToSql + Send + Sync + 'static>(mut self, expr: &str, value: T) -> Self {
        self.having_group.push(Expr::gte(expr, value));
        self
    }

    /// Add HAVING: expr < value
    pub fn having_lt<T: ToSql + Send + Sync + 'static>(mut self, expr: &str, value: T) -> Self {
        self.having_group.push(Expr::lt(expr, value));
        self
    }

    /// Add HAVING: expr <= value
    pub fn having_lte<T: ToSql + Send + Sync + 'static>(mut self, expr: &str, value: T) -> Self {
        self.having_group.push(Expr::lte(expr, value));
        self
    }

    /// Add HAVING condition with `?` placeholders.
    pub fn having_template<T: ToSql + Send + Sync + 'static>(
        mut self,
        sql: &str,
        values: Vec<T>,
    ) -> Self {
        self.having_group.push(Expr::template(sql, values));
        self
    }

    // ==================== Ordering ====================

    /// Add ORDER BY clause.
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_clauses.push(clause.to_string());
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(&format!("{column} ASC"))
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(&format!("{column} DESC"))
    }

    /// Remove every ORDER BY clause.
    pub fn clear_order(mut self) -> Self {
        self.order_clauses.clear();
        self
    }

    // ==================== Slicing ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Remove LIMIT.
    pub fn clear_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Remove OFFSET.
    pub fn clear_offset(mut self) -> Self {
        self.offset = None;
        self
    }

    /// Current LIMIT, if set.
    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    /// Current OFFSET, if set.
    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    // ==================== Build helpers ====================

    /// Render the statement, appending its bind values to `params`.
    pub fn build_into(&self, params: &mut ParamList) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&self.select_cols.join(", "));
        sql.push_str(" FROM ");
        sql.push_str(&self.from_expr);

        for join in &self.join_clauses {
            sql.push(' ');
            sql.push_str(join);
        }

        let where_sql = self.where_group.build_into(params);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        let having_sql = self.having_group.build_into(params);
        if !having_sql.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clauses.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }

    /// Render this query as a named derived table: `(SELECT ...) AS alias`.
    pub fn as_subquery(&self, alias: &str, params: &mut ParamList) -> String {
        format!("({}) AS {}", self.build_into(params), alias)
    }

    // ==================== Execution ====================

    /// Count every row this query matches, ignoring ORDER BY, LIMIT and OFFSET.
    ///
    /// Grouped queries count groups.
    pub async fn count(&self, conn: &impl GenericClient) -> PagerResult<i64> {
        let inner = self.clone().clear_order().clear_limit().clear_offset();
        CountQb::new(inner).fetch_total(conn).await
    }
}

impl SqlQb for SelectQb {
    fn build(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let sql = self.build_into(&mut params);
        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        assert_eq!(SelectQb::new("persons").to_sql(), "SELECT * FROM persons");
    }

    #[test]
    fn test_add_select_replaces_star() {
        let qb = SelectQb::new("persons").add_select("id").add_select("name");
        assert_eq!(qb.to_sql(), "SELECT id, name FROM persons");
    }

    #[test]
    fn test_distinct() {
        let qb = SelectQb::new("person_details").select("city_id").distinct();
        assert_eq!(qb.to_sql(), "SELECT DISTINCT city_id FROM person_details");
    }

    #[test]
    fn test_where_and_having_share_numbering() {
        let qb = SelectQb::new("orders")
            .select("user_id, COUNT(*) AS order_count")
            .eq("status", "paid")
            .group_by("user_id")
            .having_gt("COUNT(*)", 5i64);
        let (sql, params) = qb.build();
        assert_eq!(
            sql,
            "SELECT user_id, COUNT(*) AS order_count FROM orders WHERE status = $1 \
             GROUP BY user_id HAVING COUNT(*) > $2"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_join_group_order_limit_offset() {
        let qb = SelectQb::new("persons")
            .select("persons.id")
            .left_join("person_details", "persons.id = person_details.person_id")
            .eq("persons.id", 2i64)
            .group_by("persons.id")
            .order_by_desc("persons.id")
            .limit(10)
            .offset(20);
        assert_eq!(
            qb.to_sql(),
            "SELECT persons.id FROM persons \
             LEFT JOIN person_details ON persons.id = person_details.person_id \
             WHERE persons.id = $1 GROUP BY persons.id ORDER BY persons.id DESC \
             LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_clear_helpers() {
        let qb = SelectQb::new("persons")
            .order_by("id")
            .limit(5)
            .offset(2)
            .clear_order()
            .clear_limit()
            .clear_offset();
        assert_eq!(qb.to_sql(), "SELECT * FROM persons");
        assert_eq!(qb.limit_value(), None);
        assert_eq!(qb.offset_value(), None);
    }

    #[test]
    fn test_as_subquery_continues_outer_params() {
        let mut params = ParamList::new();
        let sub = SelectQb::new("persons")
            .between("id", 3i64, 8i64)
            .as_subquery("t", &mut params);
        assert_eq!(sub, "(SELECT * FROM persons WHERE id BETWEEN $1 AND $2) AS t");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_optional_conditions() {
        let name: Option<&str> = None;
        let qb = SelectQb::new("persons")
            .eq_opt("name", name)
            .gte_opt("id", Some(3i64))
            .in_opt::<i64>("id", Some(vec![]));
        assert_eq!(qb.to_sql(), "SELECT * FROM persons WHERE id >= $1");
    }

    #[test]
    fn test_clone_is_independent() {
        let base = SelectQb::new("persons").eq("name", "name-1");
        let sliced = base.clone().limit(2).offset(4);
        assert_eq!(base.to_sql(), "SELECT * FROM persons WHERE name = $1");
        assert_eq!(
            sliced.to_sql(),
            "SELECT * FROM persons WHERE name = $1 LIMIT 2 OFFSET 4"
        );
    }
}
