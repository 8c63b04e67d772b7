use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// The node a fetch is anchored to.
///
/// Id `0` on the wire means "the root of the forest"; inside the crate that case
/// is always `Scope::Root` and never a literal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Root,
    Parent(i64),
}

impl Scope {
    /// Maps a wire id to a scope. Callers reject negative ids before this point.
    pub fn from_id(id: i64) -> Self {
        if id > 0 { Scope::Parent(id) } else { Scope::Root }
    }

    pub fn parent_id(&self) -> Option<i64> {
        match self {
            Scope::Root => None,
            Scope::Parent(id) => Some(*id),
        }
    }
}

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub message: String,
    /// `None` for top-level comments.
    pub parent_id: Option<i64>,
    /// Derived per fetch: another page exists after the one this row is on.
    #[serde(default)]
    pub have_next: bool,
}

/// Result of fetching one level of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    /// The resolved target; `None` when the fetch targeted the root scope.
    pub parent: Option<Comment>,
    pub children: Vec<Comment>,
}

/// Filter and paging options for a children fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetterOpts {
    /// Plain "contains" filter on the message. Empty means no filter.
    pub substr: String,
    /// 1-based page number; values <= 0 mean the first page.
    pub page: i64,
    /// With the root scope, search every comment regardless of nesting.
    pub search_global: bool,
}

/// Raw `comments` row as it comes out of the database.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub message: String,
    pub parent_id: Option<i64>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            message: row.message,
            // Some stores hand back 0 instead of NULL for a missing parent.
            parent_id: row.parent_id.filter(|id| *id > 0),
            have_next: false,
        }
    }
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 10000,
        message = "Comment must be between 1 and 10000 characters"
    ))]
    pub message: String,

    /// Comment being replied to. Absent or 0 creates a top-level comment.
    #[validate(range(min = 0, message = "parent_id must not be negative"))]
    pub parent_id: Option<i64>,
}

/// Query parameters for listing comments.
#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    /// Node whose direct children are listed (0 or absent: top level).
    pub parent_id: Option<i64>,

    /// Substring the message must contain.
    pub substr: Option<String>,

    /// 1-based page number.
    pub page: Option<i64>,

    /// Search across all nesting levels when listing the top level.
    #[serde(default)]
    pub search_global: bool,
}

impl CommentListParams {
    pub fn into_opts(self) -> (i64, GetterOpts) {
        let opts = GetterOpts {
            substr: self.substr.unwrap_or_default(),
            page: self.page.unwrap_or(0),
            search_global: self.search_global,
        };
        (self.parent_id.unwrap_or(0), opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_parent_maps_to_top_level() {
        let comment = Comment::from(CommentRow {
            id: 7,
            message: "hi".to_string(),
            parent_id: None,
        });
        assert_eq!(comment.parent_id, None);
        assert!(!comment.have_next);
    }

    #[test]
    fn zero_parent_is_treated_as_root() {
        let comment = Comment::from(CommentRow {
            id: 7,
            message: "hi".to_string(),
            parent_id: Some(0),
        });
        assert_eq!(comment.parent_id, None);
        assert_eq!(Scope::from_id(0), Scope::Root);
        assert_eq!(Scope::from_id(3).parent_id(), Some(3));
    }
}
