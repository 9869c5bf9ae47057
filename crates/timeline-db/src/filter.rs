//! Declarative row filters rendered into SQL.
//!
//! Every post and comment query builds its WHERE clause here, and the
//! soft-delete condition always comes from the requester's `Visibility`.
//! No query path appends role conditions by hand.

use rusqlite::types::Value;

use timeline_policy::{SearchTerm, Visibility};

/// Conditions joined with AND, plus their positional parameters.
#[derive(Debug, Default)]
pub struct SqlFilter {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq_id(mut self, column: &str, id: i64) -> Self {
        self.conditions.push(format!("{column} = ?"));
        self.params.push(Value::Integer(id));
        self
    }

    /// Soft-delete condition on the table aliased as `alias`.
    pub fn visible(mut self, visibility: Visibility, alias: &str) -> Self {
        if let Some(condition) = deleted_condition(visibility, alias) {
            self.conditions.push(condition);
        }
        self
    }

    pub fn search(mut self, term: Option<&SearchTerm>) -> Self {
        if let Some(term) = term {
            // LIKE only folds ASCII; both sides go through the connection's
            // Unicode `fold` function instead.
            let pattern = like_pattern(&term.as_str().to_lowercase());
            self.conditions.push(
                "(fold(p.content) LIKE ? ESCAPE '\\' OR fold(u.username) LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            self.params.push(Value::Text(pattern.clone()));
            self.params.push(Value::Text(pattern));
        }
        self
    }

    /// `" WHERE a AND b"`, or an empty string when unconstrained.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameters followed by `extra`, for LIMIT/OFFSET style trailers.
    pub fn params_with(&self, extra: impl IntoIterator<Item = Value>) -> Vec<Value> {
        self.params.iter().cloned().chain(extra).collect()
    }
}

/// Filter for a post listing: visibility plus an optional search term.
#[derive(Debug, Clone, Copy)]
pub struct PostFilter<'a> {
    pub visibility: Visibility,
    pub search: Option<&'a SearchTerm>,
}

impl<'a> PostFilter<'a> {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            search: None,
        }
    }

    pub fn with_search(mut self, term: Option<&'a SearchTerm>) -> Self {
        self.search = term;
        self
    }

    pub fn to_sql(&self) -> SqlFilter {
        SqlFilter::new()
            .visible(self.visibility, "p")
            .search(self.search)
    }
}

/// Correlated subquery counting a post's comments under `visibility`.
///
/// The child filter is applied independently of the post's own deleted
/// state.
pub fn comment_count_expr(visibility: Visibility) -> String {
    match deleted_condition(visibility, "c") {
        Some(condition) => {
            format!("(SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id AND {condition})")
        }
        None => "(SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id)".to_string(),
    }
}

fn deleted_condition(visibility: Visibility, alias: &str) -> Option<String> {
    if visibility.includes_deleted() {
        None
    } else {
        Some(format!("{alias}.deleted = 0"))
    }
}

/// `%term%` with LIKE wildcards in the term matched literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
