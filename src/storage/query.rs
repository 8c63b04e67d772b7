//! Query composition and page arithmetic for children fetches.
//!
//! Nothing in here touches the database: `compose` only turns a scope and a
//! set of options into a predicate, its positional parameters and a page window.

use crate::models::comment::{Comment, GetterOpts, Scope};

/// A positional query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Int(i64),
    Text(String),
}

/// Limit/offset pair derived from a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Page numbers <= 0 are normalized to the first page before any
    /// arithmetic, so the offset can never go negative.
    pub fn for_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        PageWindow {
            limit: page_size,
            offset: page_size.saturating_mul(page - 1),
        }
    }
}

/// Output of the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedQuery {
    /// SQL boolean expression without the `WHERE` keyword. Empty means "all rows".
    pub predicate: String,
    pub params: Vec<Param>,
    pub window: PageWindow,
}

impl ComposedQuery {
    fn where_clause(&self) -> String {
        if self.predicate.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicate)
        }
    }

    /// Page of children, oldest first.
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT id, message, parent_id FROM comments{} ORDER BY id ASC LIMIT {} OFFSET {}",
            self.where_clause(),
            self.window.limit,
            self.window.offset
        )
    }

    /// Highest id under the same predicate, ignoring the page window.
    pub fn last_id_sql(&self) -> String {
        format!(
            "SELECT id FROM comments{} ORDER BY id DESC LIMIT 1",
            self.where_clause()
        )
    }
}

/// Builds the predicate for the children of `scope` under `opts`.
///
/// The root scope is restricted to `parent_id IS NULL` unless `search_global`
/// is set, because the root has no row to match positionally. The substring
/// parameter always follows the scope parameter so indices stay contiguous.
pub fn compose(scope: Scope, opts: &GetterOpts, page_size: i64) -> ComposedQuery {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Param> = Vec::new();

    match scope {
        Scope::Parent(id) => {
            params.push(Param::Int(id));
            clauses.push(format!("parent_id = ${}", params.len()));
        }
        Scope::Root if !opts.search_global => clauses.push("parent_id IS NULL".to_string()),
        Scope::Root => {}
    }

    if !opts.substr.is_empty() {
        params.push(Param::Text(contains_pattern(&opts.substr)));
        clauses.push(format!("message LIKE ${} ESCAPE '\\'", params.len()));
    }

    ComposedQuery {
        predicate: clauses.join(" AND "),
        params,
        window: PageWindow::for_page(opts.page, page_size),
    }
}

/// Wraps `substr` in `%...%` with LIKE metacharacters escaped, so the match
/// is a literal "contains".
fn contains_pattern(substr: &str) -> String {
    let mut pattern = String::with_capacity(substr.len() + 2);
    pattern.push('%');
    for ch in substr.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Sets `have_next` on a fetched page.
///
/// `last_id` is the highest id in the same scope under the same filter. When it
/// lies beyond the page, every row on the page is flagged; the page holding the
/// last id (and an empty page) gets no flags.
pub fn mark_have_next(page: &mut [Comment], last_id: Option<i64>) {
    let Some(last_id) = last_id else { return };
    let Some(page_max) = page.iter().map(|c| c.id).max() else {
        return;
    };
    let more = last_id > page_max;
    for comment in page.iter_mut() {
        comment.have_next = more;
    }
}
