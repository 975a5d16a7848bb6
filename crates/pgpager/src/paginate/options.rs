//! Pagination options, their validation, and the slice they select.

use crate::error::{PagerError, PagerResult};
use crate::paginate::result::{PageTotals, Pagination};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Rows per page when none is given.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// What page to fetch and whether to count the full result.
///
/// Build it in code:
///
/// ```ignore
/// let opts = PaginateOptions::new().per_page(25).current_page(3).length_aware(true);
/// ```
///
/// or parse untyped input (request bodies, query strings) through
/// `TryFrom<&serde_json::Value>` / `Deserialize`, which accepts
/// `perPage`, `currentPage`, `isFromStart` and `isLengthAware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginateOptions {
    per_page: i64,
    current_page: i64,
    is_from_start: bool,
    is_length_aware: bool,
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            current_page: 1,
            is_from_start: false,
            is_length_aware: false,
        }
    }
}

impl PaginateOptions {
    /// Options with defaults: 10 per page, page 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows per page.
    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Requested page, 1-based. Values below 1 are treated as 1.
    pub fn current_page(mut self, current_page: i64) -> Self {
        self.current_page = current_page;
        self
    }

    /// Return every row from the first through the requested page.
    pub fn from_start(mut self, is_from_start: bool) -> Self {
        self.is_from_start = is_from_start;
        self
    }

    /// Count totals on every page, not only the first.
    pub fn length_aware(mut self, is_length_aware: bool) -> Self {
        self.is_length_aware = is_length_aware;
        self
    }

    pub fn get_per_page(&self) -> i64 {
        self.per_page
    }

    pub fn get_current_page(&self) -> i64 {
        self.current_page
    }

    pub fn is_from_start(&self) -> bool {
        self.is_from_start
    }

    pub fn is_length_aware(&self) -> bool {
        self.is_length_aware
    }

    /// Reject options no page can be computed from.
    pub fn validate(&self) -> PagerResult<()> {
        if self.per_page < 1 {
            return Err(PagerError::validation("perPage must be greater than zero"));
        }
        Ok(())
    }

    /// The offset/limit window these options select.
    pub fn slice(&self) -> PageSlice {
        let per_page = self.per_page;
        let current_page = self.current_page.max(1);
        let fetch_totals = self.is_length_aware || current_page == 1 || self.is_from_start;

        let (offset, limit) = if self.is_from_start {
            (0, per_page.saturating_mul(current_page))
        } else {
            ((current_page - 1).saturating_mul(per_page), per_page)
        };

        PageSlice {
            per_page,
            current_page,
            offset,
            limit,
            fetch_totals,
        }
    }
}

impl TryFrom<&Value> for PaginateOptions {
    type Error = PagerError;

    /// Parse loose input. Checks run in a fixed order and the first failure
    /// wins: `perPage`, `currentPage`, `isFromStart`, `isLengthAware`.
    fn try_from(value: &Value) -> PagerResult<Self> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => return Err(PagerError::validation("options must be an object")),
        };

        let defaults = Self::default();
        Ok(Self {
            per_page: number_field(map, "perPage", "per_page")?.unwrap_or(defaults.per_page),
            current_page: number_field(map, "currentPage", "current_page")?
                .unwrap_or(defaults.current_page),
            is_from_start: bool_field(map, "isFromStart", "is_from_start")?
                .unwrap_or(defaults.is_from_start),
            is_length_aware: bool_field(map, "isLengthAware", "is_length_aware")?
                .unwrap_or(defaults.is_length_aware),
        })
    }
}

impl TryFrom<Value> for PaginateOptions {
    type Error = PagerError;

    fn try_from(value: Value) -> PagerResult<Self> {
        Self::try_from(&value)
    }
}

impl<'de> Deserialize<'de> for PaginateOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(&value).map_err(serde::de::Error::custom)
    }
}

/// Missing and `null` keys both mean "use the default".
fn field<'a>(map: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    map.get(key)
        .or_else(|| map.get(alias))
        .filter(|v| !v.is_null())
}

fn number_field(map: &Map<String, Value>, key: &str, alias: &str) -> PagerResult<Option<i64>> {
    match field(map, key, alias) {
        None => Ok(None),
        Some(v) => parse_number(v)
            .map(Some)
            .ok_or_else(|| PagerError::validation(format!("{key} must be a number"))),
    }
}

fn bool_field(map: &Map<String, Value>, key: &str, alias: &str) -> PagerResult<Option<bool>> {
    match field(map, key, alias) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(PagerError::validation(format!("{key} must be a boolean"))),
    }
}

/// Numbers and numeric strings; fractions are floored.
fn parse_number(value: &Value) -> Option<i64> {
    let float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    float.is_finite().then(|| float.floor() as i64)
}

/// The window a page query reads, plus whether totals are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub per_page: i64,
    /// Requested page after clamping to 1.
    pub current_page: i64,
    pub offset: i64,
    pub limit: i64,
    pub fetch_totals: bool,
}

impl PageSlice {
    /// Pagination metadata for `returned` rows read from this slice.
    ///
    /// `total` is the count query's result, `None` when totals were not fetched.
    pub fn pagination(&self, total: Option<i64>, returned: usize) -> Pagination {
        let returned = i64::try_from(returned).unwrap_or(i64::MAX);
        Pagination {
            totals: total.map(|t| PageTotals::compute(t, self.per_page, self.current_page)),
            per_page: self.per_page,
            current_page: self.current_page,
            from: self.offset,
            to: self.offset.saturating_add(returned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: Value) -> String {
        PaginateOptions::try_from(&value)
            .expect_err("options should be rejected")
            .validation_message()
            .expect("validation error")
            .to_string()
    }

    #[test]
    fn defaults() {
        let opts = PaginateOptions::try_from(&json!({})).unwrap();
        assert_eq!(opts, PaginateOptions::new());
        assert_eq!(opts.get_per_page(), 10);
        assert_eq!(opts.get_current_page(), 1);
        assert!(!opts.is_from_start());
        assert!(!opts.is_length_aware());

        assert_eq!(PaginateOptions::try_from(&Value::Null).unwrap(), opts);
    }

    #[test]
    fn rejects_non_numeric_page_fields() {
        assert_eq!(message(json!({ "perPage": "x" })), "perPage must be a number");
        assert_eq!(
            message(json!({ "currentPage": "x" })),
            "currentPage must be a number"
        );
        assert_eq!(message(json!({ "perPage": true })), "perPage must be a number");
        assert_eq!(message(json!({ "currentPage": [1] })), "currentPage must be a number");
    }

    #[test]
    fn rejects_non_boolean_flags() {
        assert_eq!(
            message(json!({ "isFromStart": "x" })),
            "isFromStart must be a boolean"
        );
        assert_eq!(
            message(json!({ "isLengthAware": "x" })),
            "isLengthAware must be a boolean"
        );
        assert_eq!(
            message(json!({ "isLengthAware": 1 })),
            "isLengthAware must be a boolean"
        );
    }

    #[test]
    fn first_failing_check_wins() {
        let all_bad = json!({
            "perPage": "x",
            "currentPage": "x",
            "isFromStart": "x",
            "isLengthAware": "x",
        });
        assert_eq!(message(all_bad), "perPage must be a number");
        assert_eq!(
            message(json!({ "currentPage": "x", "isFromStart": "x" })),
            "currentPage must be a number"
        );
        assert_eq!(
            message(json!({ "isFromStart": 0, "isLengthAware": "x" })),
            "isFromStart must be a boolean"
        );
    }

    #[test]
    fn accepts_numeric_strings_and_floors_fractions() {
        let opts = PaginateOptions::try_from(&json!({
            "perPage": "25",
            "currentPage": 2.9,
            "isLengthAware": true,
        }))
        .unwrap();
        assert_eq!(opts.get_per_page(), 25);
        assert_eq!(opts.get_current_page(), 2);
        assert!(opts.is_length_aware());

        let opts = PaginateOptions::try_from(&json!({ "perPage": " 3.5 " })).unwrap();
        assert_eq!(opts.get_per_page(), 3);
    }

    #[test]
    fn accepts_snake_case_and_null() {
        let opts = PaginateOptions::try_from(&json!({
            "per_page": 5,
            "current_page": null,
            "is_from_start": true,
        }))
        .unwrap();
        assert_eq!(opts.get_per_page(), 5);
        assert_eq!(opts.get_current_page(), 1);
        assert!(opts.is_from_start());
    }

    #[test]
    fn rejects_non_object_input() {
        assert_eq!(message(json!([1, 2])), "options must be an object");
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let opts: PaginateOptions =
            serde_json::from_str(r#"{"perPage":2,"currentPage":3}"#).unwrap();
        assert_eq!(opts, PaginateOptions::new().per_page(2).current_page(3));

        let err = serde_json::from_str::<PaginateOptions>(r#"{"isFromStart":"yes"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("isFromStart must be a boolean"), "{err}");
    }

    #[test]
    fn validate_rejects_empty_pages() {
        assert!(PaginateOptions::new().validate().is_ok());
        for per_page in [0, -3] {
            let err = PaginateOptions::new().per_page(per_page).validate().unwrap_err();
            assert_eq!(
                err.validation_message(),
                Some("perPage must be greater than zero")
            );
        }
    }

    #[test]
    fn slice_for_single_pages() {
        let slice = PaginateOptions::new().per_page(2).current_page(2).slice();
        assert_eq!(slice.offset, 2);
        assert_eq!(slice.limit, 2);
        assert!(!slice.fetch_totals);

        let slice = PaginateOptions::new().per_page(2).current_page(1).slice();
        assert_eq!(slice.offset, 0);
        assert!(slice.fetch_totals);

        let slice = PaginateOptions::new()
            .per_page(2)
            .current_page(4)
            .length_aware(true)
            .slice();
        assert_eq!(slice.offset, 6);
        assert!(slice.fetch_totals);
    }

    #[test]
    fn slice_from_start_is_cumulative() {
        let slice = PaginateOptions::new()
            .per_page(2)
            .current_page(3)
            .from_start(true)
            .slice();
        assert_eq!(slice.offset, 0);
        assert_eq!(slice.limit, 6);
        assert!(slice.fetch_totals);
    }

    #[test]
    fn pages_below_one_behave_like_page_one() {
        let first = PaginateOptions::new().per_page(3).slice();
        for page in [0, -1, i64::MIN] {
            assert_eq!(PaginateOptions::new().per_page(3).current_page(page).slice(), first);
        }
    }

    #[test]
    fn huge_pages_saturate() {
        let slice = PaginateOptions::new()
            .per_page(i64::MAX)
            .current_page(3)
            .from_start(true)
            .slice();
        assert_eq!(slice.limit, i64::MAX);

        let slice = PaginateOptions::new().per_page(i64::MAX).current_page(3).slice();
        assert_eq!(slice.offset, i64::MAX);
    }
}
