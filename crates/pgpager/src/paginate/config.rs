//! Paginator configuration.

use crate::paginate::result::Pagination;
use std::fmt;
use std::sync::Arc;

/// Hook applied to every assembled [`Pagination`] before it is returned.
pub type PostProcess = Arc<dyn Fn(Pagination) -> Pagination + Send + Sync>;

/// Configuration shared by paginated queries.
///
/// Build one per application and hand it to
/// [`Paginated::with_config`](crate::paginate::Paginated::with_config).
///
/// ```ignore
/// let config = PaginateConfig::new().post_process(|mut p| {
///     // expose 1-based row numbers
///     p.from += 1;
///     p
/// });
/// ```
#[derive(Clone, Default)]
pub struct PaginateConfig {
    post_process: Option<PostProcess>,
}

impl PaginateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the post-processing hook (identity by default).
    pub fn post_process<F>(mut self, f: F) -> Self
    where
        F: Fn(Pagination) -> Pagination + Send + Sync + 'static,
    {
        self.post_process = Some(Arc::new(f));
        self
    }

    /// Whether a hook is installed.
    pub fn has_post_process(&self) -> bool {
        self.post_process.is_some()
    }

    /// Run the hook, or return `pagination` untouched.
    pub fn apply(&self, pagination: Pagination) -> Pagination {
        match &self.post_process {
            Some(f) => f(pagination),
            None => pagination,
        }
    }
}

impl fmt::Debug for PaginateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginateConfig")
            .field("post_process", &self.post_process.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
