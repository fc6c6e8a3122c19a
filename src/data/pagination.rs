//! Turning the raw `page` and `search` query values into a bounded fetch.

pub const PAGE_SIZE: i64 = 2;

/// A validated request for one page of students.
///
/// Construction never fails: anything that isn't a positive whole number reads
/// as the first page, and a blank search means no filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    search: Option<String>,
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, search: Option<&str>) -> Self {
        let page = page
            .and_then(parse_whole_number)
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        let search = search
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(ToString::to_string);

        Self { page, search }
    }

    pub const fn page(&self) -> i64 {
        self.page
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub const fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }

    /// `ILIKE` pattern matching the search term anywhere, with wildcards escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|search| format!("%{}%", escape_like(search)))
    }
}

/// Accepts `"3"`, `" 3 "` and `"3.0"`, rejects `"3.5"`, `"abc"` and `""`.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_whole_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
