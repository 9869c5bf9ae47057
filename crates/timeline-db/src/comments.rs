use anyhow::Result;
use rusqlite::{Connection, params, params_from_iter};

use timeline_policy::{ContentFlags, Grant, Visibility};

use crate::content::{self, ContentTable};
use crate::filter::SqlFilter;
use crate::models::CommentRow;
use crate::posts::query_post;
use crate::{Database, DbError, OptionalExt};

impl Database {
    /// Insert a comment on a post that is currently not deleted, whoever the
    /// author is. Fails with `DbError::NotFound` otherwise.
    pub fn insert_comment(&self, post_id: i64, user_id: i64, content: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if query_post(&tx, post_id, Visibility::ActiveOnly)?.is_none() {
                return Err(DbError::NotFound.into());
            }

            tx.execute(
                "INSERT INTO comments (post_id, user_id, content) VALUES (?1, ?2, ?3)",
                params![post_id, user_id, content],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        })
    }

    /// Comment `id` under post `post_id`, filtered by `visibility`.
    pub fn get_comment(
        &self,
        post_id: i64,
        id: i64,
        visibility: Visibility,
    ) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let filter = SqlFilter::new()
                .eq_id("c.id", id)
                .eq_id("c.post_id", post_id)
                .visible(visibility, "c");
            let mut stmt = conn.prepare(&select_comments(&filter))?;
            stmt.query_row(params_from_iter(filter.params()), CommentRow::from_row)
                .optional()
        })
    }

    /// All comments on a post, newest first.
    pub fn list_comments(&self, post_id: i64, visibility: Visibility) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| query_comments(conn, post_id, visibility))
    }

    pub fn edit_comment(&self, id: i64, content: &str, grant: Grant) -> Result<ContentFlags> {
        self.with_conn_mut(|conn| content::edit(conn, ContentTable::Comments, id, content, grant))
    }

    pub fn soft_delete_comment(&self, id: i64) -> Result<ContentFlags> {
        self.with_conn_mut(|conn| content::soft_delete(conn, ContentTable::Comments, id))
    }
}

fn select_comments(filter: &SqlFilter) -> String {
    format!(
        "SELECT c.id, c.post_id, c.user_id, u.username, u.full_name, c.content, c.deleted,
                c.edited, c.edited_by_admin, c.created_at, c.updated_at
         FROM comments c
         INNER JOIN users u ON u.id = c.user_id{}",
        filter.where_clause()
    )
}

fn query_comments(conn: &Connection, post_id: i64, visibility: Visibility) -> Result<Vec<CommentRow>> {
    let filter = SqlFilter::new()
        .eq_id("c.post_id", post_id)
        .visible(visibility, "c");
    let sql = format!(
        "{} ORDER BY c.created_at DESC, c.id DESC",
        select_comments(&filter)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(filter.params()), CommentRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
