//! Boolean expression layer for WHERE/HAVING clauses.
//!
//! Expressions render `$n` placeholders while they are built, appending their
//! values to a [`ParamList`] shared by the whole statement. WHERE and HAVING
//! therefore number their placeholders continuously and a query wrapped as a
//! derived table keeps its numbering intact.

use crate::qb::param::{Param, ParamList};
use tokio_postgres::types::ToSql;

/// Expression node for WHERE/HAVING clauses.
#[derive(Clone, Debug)]
pub enum Expr {
    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// NOT: negate the inner expression.
    Not(Box<Expr>),

    /// Simple comparison: column op $n
    Compare {
        column: String,
        op: &'static str,
        value: Param,
    },

    /// column IS NULL / column IS NOT NULL
    NullCheck { column: String, is_null: bool },

    /// column IN ($1, $2, ...) / column NOT IN (...)
    InList {
        column: String,
        values: Vec<Param>,
        negated: bool,
    },

    /// column BETWEEN $n AND $m
    Between {
        column: String,
        from: Param,
        to: Param,
        negated: bool,
    },

    /// SQL with `?` placeholders, numbered at build time.
    Template { sql: String, params: Vec<Param> },

    /// Raw SQL fragment without parameters.
    Raw(String),

    /// Always true (empty NOT IN lists).
    True,

    /// Always false (empty IN lists).
    False,
}

impl Expr {
    /// Create an AND expression from a list of expressions.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Create an OR expression from a list of expressions.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Create a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Create a comparison `column op value` with a caller-chosen operator.
    pub fn compare<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        op: &'static str,
        value: T,
    ) -> Self {
        Expr::Compare {
            column: column.into(),
            op,
            value: Param::new(value),
        }
    }

    /// column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "=", value)
    }

    /// column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "!=", value)
    }

    /// column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, ">", value)
    }

    /// column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, ">=", value)
    }

    /// column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "<", value)
    }

    /// column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "<=", value)
    }

    /// column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Self::compare(column, "LIKE", pattern)
    }

    /// column ILIKE pattern
    pub fn ilike<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Self::compare(column, "ILIKE", pattern)
    }

    /// column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    /// column IS NOT NULL
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// column IN (values...); an empty list matches nothing.
    pub fn in_list<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Expr::False;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
            negated: false,
        }
    }

    /// column NOT IN (values...); an empty list matches everything.
    pub fn not_in<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Expr::True;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
            negated: true,
        }
    }

    /// column BETWEEN from AND to
    pub fn between<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        from: T,
        to: T,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            from: Param::new(from),
            to: Param::new(to),
            negated: false,
        }
    }

    /// column NOT BETWEEN from AND to
    pub fn not_between<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        from: T,
        to: T,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            from: Param::new(from),
            to: Param::new(to),
            negated: true,
        }
    }

    /// Template expression from values, e.g. `("a = ? OR b = ?", vec![1, 2])`.
    pub fn template<T: ToSql + Send + Sync + 'static>(
        sql: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        Expr::Template {
            sql: sql.into(),
            params: values.into_iter().map(Param::new).collect(),
        }
    }

    /// Raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// Check if this expression contains no conditions.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().all(Expr::is_empty),
            Expr::Not(inner) => inner.is_empty(),
            _ => false,
        }
    }

    /// Render this expression, appending its values to `params`.
    pub fn build(&self, params: &mut ParamList) -> String {
        match self {
            Expr::And(exprs) => join_group(exprs, " AND ", params),
            Expr::Or(exprs) => join_group(exprs, " OR ", params),
            Expr::Not(inner) => {
                let sql = inner.build(params);
                if sql.is_empty() {
                    sql
                } else {
                    format!("NOT ({sql})")
                }
            }
            Expr::Compare { column, op, value } => {
                let idx = params.push_param(value.clone());
                format!("{column} {op} ${idx}")
            }
            Expr::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{column} IS NULL")
                } else {
                    format!("{column} IS NOT NULL")
                }
            }
            Expr::InList {
                column,
                values,
                negated,
            } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| format!("${}", params.push_param(v.clone())))
                    .collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{column} {op} ({})", placeholders.join(", "))
            }
            Expr::Between {
                column,
                from,
                to,
                negated,
            } => {
                let lo = params.push_param(from.clone());
                let hi = params.push_param(to.clone());
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{column} {op} ${lo} AND ${hi}")
            }
            Expr::Template {
                sql,
                params: values,
            } => {
                let mut out = String::with_capacity(sql.len() + values.len() * 2);
                let mut values = values.iter().peekable();
                for ch in sql.chars() {
                    match values.next_if(|_| ch == '?') {
                        Some(v) => {
                            out.push('$');
                            out.push_str(&params.push_param(v.clone()).to_string());
                        }
                        None => out.push(ch),
                    }
                }
                out
            }
            Expr::Raw(sql) => sql.clone(),
            Expr::True => "1=1".to_string(),
            Expr::False => "1=0".to_string(),
        }
    }
}

/// Join non-empty children with `sep`.
///
/// Nested groups are always parenthesized; raw and template fragments are
/// parenthesized whenever they have siblings.
fn join_group(exprs: &[Expr], sep: &str, params: &mut ParamList) -> String {
    join_fragments(exprs, sep, params, |e| matches!(e, Expr::And(_) | Expr::Or(_)))
}

fn join_fragments(
    exprs: &[Expr],
    sep: &str,
    params: &mut ParamList,
    always_wrap: fn(&Expr) -> bool,
) -> String {
    let parts: Vec<&Expr> = exprs.iter().filter(|e| !e.is_empty()).collect();
    let has_siblings = parts.len() > 1;
    parts
        .into_iter()
        .map(|e| {
            let sql = e.build(params);
            let wrap = always_wrap(e)
                || (has_siblings && matches!(e, Expr::Raw(_) | Expr::Template { .. }));
            if wrap && !sql.is_empty() {
                format!("({sql})")
            } else {
                sql
            }
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Conditions ANDed together, built incrementally by the query builders.
#[derive(Clone, Debug, Default)]
pub struct ExprGroup {
    exprs: Vec<Expr>,
}

impl ExprGroup {
    /// Create a new empty expression group.
    pub fn new() -> Self {
        Self { exprs: Vec::new() }
    }

    /// Check if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.exprs.iter().all(Expr::is_empty)
    }

    /// Add an expression to be ANDed.
    pub fn push(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    /// Render the group (without the `WHERE`/`HAVING` keyword) into `params`.
    pub fn build_into(&self, params: &mut ParamList) -> String {
        join_fragments(&self.exprs, " AND ", params, |e| matches!(e, Expr::Or(_)))
    }

    /// Render the group into a fresh parameter list.
    pub fn build(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let sql = self.build_into(&mut params);
        (sql, params)
    }

    /// Get all expressions.
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_eq() {
        let mut params = ParamList::new();
        let sql = Expr::eq("name", "alice").build(&mut params);
        assert_eq!(sql, "name = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_nested_and_or() {
        let expr = Expr::and(vec![
            Expr::eq("status", "active"),
            Expr::or(vec![Expr::eq("role", "admin"), Expr::eq("role", "owner")]),
        ]);
        let mut params = ParamList::new();
        assert_eq!(
            expr.build(&mut params),
            "status = $1 AND (role = $2 OR role = $3)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_empty_lists() {
        let mut params = ParamList::new();
        assert_eq!(Expr::in_list::<i32>("id", vec![]).build(&mut params), "1=0");
        assert_eq!(Expr::not_in::<i32>("id", vec![]).build(&mut params), "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_between_and_template() {
        let mut params = ParamList::new();
        assert_eq!(
            Expr::between("id", 3i64, 8i64).build(&mut params),
            "id BETWEEN $1 AND $2"
        );
        assert_eq!(
            Expr::template("a = ? OR b = ?", vec![1i32, 2i32]).build(&mut params),
            "a = $3 OR b = $4"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_template_with_missing_values_keeps_marks() {
        let mut params = ParamList::new();
        let sql = Expr::template("a = ? AND b = ?", vec![1i32]).build(&mut params);
        assert_eq!(sql, "a = $1 AND b = ?");
    }

    #[test]
    fn test_not_and_null_check() {
        let mut params = ParamList::new();
        assert_eq!(
            Expr::not(Expr::eq("banned", true)).build(&mut params),
            "NOT (banned = $1)"
        );
        assert_eq!(
            Expr::is_null("deleted_at").build(&mut params),
            "deleted_at IS NULL"
        );
    }

    #[test]
    fn test_group_continues_numbering() {
        let mut where_group = ExprGroup::new();
        where_group.push(Expr::eq("status", "active"));
        where_group.push(Expr::in_list("role", vec!["admin", "user"]));

        let mut having_group = ExprGroup::new();
        having_group.push(Expr::gt("COUNT(*)", 5i64));

        let mut params = ParamList::new();
        let where_sql = where_group.build_into(&mut params);
        let having_sql = having_group.build_into(&mut params);

        assert_eq!(where_sql, "status = $1 AND role IN ($2, $3)");
        assert_eq!(having_sql, "COUNT(*) > $4");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_group_wraps_or() {
        let mut group = ExprGroup::new();
        group.push(Expr::or(vec![Expr::ilike("name", "%a%"), Expr::ilike("email", "%a%")]));
        group.push(Expr::is_not_null("email"));
        let (sql, params) = group.build();
        assert_eq!(sql, "(name ILIKE $1 OR email ILIKE $2) AND email IS NOT NULL");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_raw_with_siblings_is_parenthesized() {
        let mut group = ExprGroup::new();
        group.push(Expr::raw("person_id = 2 OR person_id = 4"));
        group.push(Expr::eq("city_id", 1i64));
        let (sql, _) = group.build();
        assert_eq!(sql, "(person_id = 2 OR person_id = 4) AND city_id = $1");

        let mut alone = ExprGroup::new();
        alone.push(Expr::raw("person_id = 2 OR person_id = 4"));
        assert_eq!(alone.build().0, "person_id = 2 OR person_id = 4");
    }

    #[test]
    fn test_template_inside_and_is_parenthesized() {
        let mut params = ParamList::new();
        let sql = Expr::and(vec![
            Expr::template("a = ? OR b = ?", vec![1i32, 2i32]),
            Expr::eq("c", 3i32),
        ])
        .build(&mut params);
        assert_eq!(sql, "(a = $1 OR b = $2) AND c = $3");
    }
}
