//! SELECT query builder the paginator works on.
//!
//! # Usage
//!
//! ```ignore
//! use pgpager::qb::{self, SqlQb};
//!
//! let people = qb::select("persons")
//!     .select_cols(&["id", "name"])
//!     .between("id", 3i64, 8i64)
//!     .order_by("id")
//!     .fetch_all::<(i64, String)>(&client)
//!     .await?;
//!
//! let total = qb::select("persons").eq("name", "name-1").count(&client).await?;
//! ```

mod count;
mod expr;
mod param;
mod select;
mod traits;

pub use count::{COUNT_ALIAS, CountQb, TOTAL_COLUMN, read_total};
pub use expr::{Expr, ExprGroup};
pub use param::{Param, ParamList};
pub use select::SelectQb;
pub use traits::SqlQb;

/// Create a SELECT query builder for the given table.
///
/// # Example
/// ```ignore
/// let qb = pgpager::qb::select("persons").eq("id", 1i64);
/// ```
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create a SELECT query builder with a custom FROM expression.
///
/// # Example
/// ```ignore
/// let qb = pgpager::qb::select_from("persons p").left_join("person_details d", "p.id = d.person_id");
/// ```
pub fn select_from(from_expr: &str) -> SelectQb {
    SelectQb::from(from_expr)
}
