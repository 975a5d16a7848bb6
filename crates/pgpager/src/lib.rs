//! # pgpager
//!
//! Offset pagination for PostgreSQL SELECT queries, with optional totals.
//!
//! ## Features
//!
//! - **Page windows**: `perPage` / `currentPage` become LIMIT/OFFSET on your query
//! - **Totals on demand**: a `COUNT(*)` over the unsliced query runs only when needed
//! - **From-start mode**: read every row from the first page through the current one
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//! - **Serializable envelope**: `{ data, pagination }` in camelCase via `serde`
//!
//! ## Example
//!
//! ```ignore
//! use pgpager::{Paginate, PaginateOptions, qb};
//!
//! let page = qb::select("persons")
//!     .order_by("id")
//!     .paginate(PaginateOptions::new().per_page(2).current_page(2).length_aware(true))?
//!     .fetch::<(i64, String)>(&client)
//!     .await?;
//!
//! assert_eq!(page.pagination.current_page, 2);
//! assert_eq!(page.pagination.last_page(), Some(5));
//! println!("{}", serde_json::to_string(&page.map(|(id, _)| id))?);
//! ```

pub mod client;
pub mod error;
pub mod paginate;
pub mod prelude;
pub mod qb;
pub mod row;

pub use client::GenericClient;
pub use error::{PagerError, PagerResult};
pub use paginate::{
    DEFAULT_PER_PAGE, Page, PageSlice, PageTotals, Paginate, PaginateConfig, PaginateOptions,
    Paginated, Pagination, PostProcess,
};
pub use row::{FromRow, RowExt};

pub use qb::{CountQb, Expr, ExprGroup, SelectQb, SqlQb, select, select_from};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config, create_pool_with_tls};
