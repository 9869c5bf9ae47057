//! Edit and soft-delete, shared by posts and comments.

use anyhow::Result;
use rusqlite::{Connection, params};
use tracing::debug;

use timeline_policy::{ContentFlags, Grant};

use crate::{DbError, NOW_SQL, OptionalExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTable {
    Posts,
    Comments,
}

impl ContentTable {
    fn name(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Comments => "comments",
        }
    }
}

/// Replace content and advance the flags from their current stored value,
/// inside one transaction so a concurrent admin edit can't be overwritten
/// with `edited_by_admin = 0`.
pub(crate) fn edit(
    conn: &mut Connection,
    table: ContentTable,
    id: i64,
    content: &str,
    grant: Grant,
) -> Result<ContentFlags> {
    let tx = conn.transaction()?;

    let current = read_flags(&tx, table, id)?.ok_or(DbError::NotFound)?;
    let next = current.after_edit(grant).map_err(DbError::from)?;

    tx.execute(
        &format!(
            "UPDATE {} SET content = ?1, edited = ?2, edited_by_admin = ?3, updated_at = {NOW_SQL}
             WHERE id = ?4",
            table.name()
        ),
        params![content, next.edited, next.edited_by_admin, id],
    )?;
    tx.commit()?;

    debug!("{} {} edited ({:?} -> {:?})", table.name(), id, current.state(), next.state());
    Ok(next)
}

/// Set the deleted flag. The row is kept; children are not touched.
pub(crate) fn soft_delete(conn: &mut Connection, table: ContentTable, id: i64) -> Result<ContentFlags> {
    let tx = conn.transaction()?;

    let current = read_flags(&tx, table, id)?.ok_or(DbError::NotFound)?;
    let next = current.after_delete();

    if next != current {
        tx.execute(
            &format!(
                "UPDATE {} SET deleted = 1, updated_at = {NOW_SQL} WHERE id = ?1",
                table.name()
            ),
            [id],
        )?;
    }
    tx.commit()?;

    debug!("{} {} soft-deleted", table.name(), id);
    Ok(next)
}

fn read_flags(conn: &Connection, table: ContentTable, id: i64) -> Result<Option<ContentFlags>> {
    conn.query_row(
        &format!(
            "SELECT deleted, edited, edited_by_admin FROM {} WHERE id = ?1",
            table.name()
        ),
        [id],
        |row| Ok(ContentFlags::new(row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()
}
