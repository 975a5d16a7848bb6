//! Row mapping traits and utilities

use crate::error::{PagerError, PagerResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust value.
///
/// # Example
///
/// ```ignore
/// use pgpager::{FromRow, PagerResult, RowExt};
///
/// struct Person {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for Person {
///     fn from_row(row: &tokio_postgres::Row) -> PagerResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             name: row.try_get_column("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> PagerResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning PagerError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> PagerResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Try to get a column value by position.
    fn try_get_index<T>(&self, idx: usize) -> PagerResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> PagerResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| PagerError::decode(column, e.to_string()))
    }

    fn try_get_index<T>(&self, idx: usize) -> PagerResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(idx)
            .map_err(|e| PagerError::decode(format!("#{idx}"), e.to_string()))
    }
}

// Tuples read columns by position, which is what a plucked column list needs:
// `select_cols(&["id"])` pages as `Page<(i64,)>`.
macro_rules! impl_from_row_tuple {
    ($($idx:tt => $ty:ident),+) => {
        impl<$($ty),+> FromRow for ($($ty,)+)
        where
            $($ty: for<'a> FromSql<'a>),+
        {
            fn from_row(row: &Row) -> PagerResult<Self> {
                Ok(($(row.try_get_index::<$ty>($idx)?,)+))
            }
        }
    };
}

impl_from_row_tuple!(0 => A);
impl_from_row_tuple!(0 => A, 1 => B);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
