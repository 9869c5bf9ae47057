use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

use timeline_policy::{ContentFlags, Grant, Page, PageRequest, Visibility};

use crate::content::{self, ContentTable};
use crate::filter::{PostFilter, SqlFilter, comment_count_expr};
use crate::models::PostRow;
use crate::{Database, OptionalExt};

impl Database {
    pub fn insert_post(&self, user_id: i64, content: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (user_id, content) VALUES (?1, ?2)",
                params![user_id, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Single post under `visibility`; `None` if absent or filtered out.
    pub fn get_post(&self, id: i64, visibility: Visibility) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id, visibility))
    }

    /// One page of posts, newest first, with a total computed by the same
    /// filter. Count and page are read inside one transaction so they
    /// agree with each other.
    pub fn list_posts(&self, filter: &PostFilter<'_>, page: PageRequest) -> Result<Page<PostRow>> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let sql_filter = filter.to_sql();

            let total: i64 = tx.query_row(
                &format!(
                    "SELECT COUNT(*) FROM posts p INNER JOIN users u ON u.id = p.user_id{}",
                    sql_filter.where_clause()
                ),
                params_from_iter(sql_filter.params()),
                |row| row.get(0),
            )?;

            let sql = format!(
                "{} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?",
                select_posts(filter.visibility, &sql_filter)
            );
            let mut stmt = tx.prepare(&sql)?;
            let items = stmt
                .query_map(
                    params_from_iter(sql_filter.params_with([
                        Value::Integer(i64::from(page.limit)),
                        Value::Integer(i64::from(page.offset)),
                    ])),
                    PostRow::from_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            drop(stmt);
            tx.finish()?;

            Ok(Page {
                items,
                total: total.max(0) as u64,
                request: page,
            })
        })
    }

    pub fn edit_post(&self, id: i64, content: &str, grant: Grant) -> Result<ContentFlags> {
        self.with_conn_mut(|conn| content::edit(conn, ContentTable::Posts, id, content, grant))
    }

    pub fn soft_delete_post(&self, id: i64) -> Result<ContentFlags> {
        self.with_conn_mut(|conn| content::soft_delete(conn, ContentTable::Posts, id))
    }
}

fn select_posts(visibility: Visibility, filter: &SqlFilter) -> String {
    format!(
        "SELECT p.id, p.user_id, u.username, u.full_name, p.content, p.deleted, p.edited,
                p.edited_by_admin, {} AS comment_count, p.created_at, p.updated_at
         FROM posts p
         INNER JOIN users u ON u.id = p.user_id{}",
        comment_count_expr(visibility),
        filter.where_clause()
    )
}

pub(crate) fn query_post(conn: &Connection, id: i64, visibility: Visibility) -> Result<Option<PostRow>> {
    let filter = SqlFilter::new().eq_id("p.id", id).visible(visibility, "p");
    let mut stmt = conn.prepare(&select_posts(visibility, &filter))?;
    stmt.query_row(params_from_iter(filter.params()), PostRow::from_row)
        .optional()
}
