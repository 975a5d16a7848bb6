//! Common imports for paginating queries.
//!
//! ```ignore
//! use pgpager::prelude::*;
//! ```

pub use crate::{
    FromRow, GenericClient, Page, Paginate, PaginateConfig, PaginateOptions, Pagination,
    PagerError, PagerResult, RowExt, SelectQb, SqlQb, select, select_from,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
