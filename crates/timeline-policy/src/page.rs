pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized offset page. Never rejected: anything unusable falls back
/// to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Build from raw query-string values.
    ///
    /// Missing, non-numeric, zero or negative limits become
    /// `DEFAULT_PAGE_SIZE`; limits above `MAX_PAGE_SIZE` are capped.
    /// Missing, non-numeric or negative offsets become 0.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = match parse_number(limit) {
            Some(n) if n > 0 => n.min(i64::from(MAX_PAGE_SIZE)) as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        let offset = match parse_number(offset) {
            Some(n) if n > 0 => n.min(i64::from(u32::MAX)) as u32,
            _ => 0,
        };
        Self { limit, offset }
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// One page of rows plus the total under the same filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        u64::from(self.request.offset) + (self.items.len() as u64) < self.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchTermError {
    #[error("Search query is required")]
    Blank,
}

/// A trimmed, non-blank search term. Matching is a plain case-insensitive
/// substring test against post content or author username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(raw: &str) -> Result<Self, SearchTermError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchTermError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
