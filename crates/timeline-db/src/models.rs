//! Database row types. These map directly to SQLite rows and stay distinct
//! from the timeline-types API records so the store layer owns its shape.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use tracing::warn;

use timeline_types::models::{CommentRecord, PostRecord, Role, UserProfile};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub created_at: String,
}

impl UserRow {
    pub(crate) const COLUMNS: &'static str = "id, username, password, full_name, role, created_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            full_name: row.get(3)?,
            role: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    pub fn role(&self) -> Result<Role> {
        self.role
            .parse()
            .map_err(|e| anyhow!("Corrupt role on user {}: {}", self.id, e))
    }

    pub fn profile(&self) -> Result<UserProfile> {
        Ok(UserProfile {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role: self.role()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub content: String,
    pub deleted: bool,
    pub edited: bool,
    pub edited_by_admin: bool,
    pub comment_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl PostRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            username: row.get(2)?,
            full_name: row.get(3)?,
            content: row.get(4)?,
            deleted: row.get(5)?,
            edited: row.get(6)?,
            edited_by_admin: row.get(7)?,
            comment_count: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    pub fn into_record(self) -> PostRecord {
        PostRecord {
            created_at: parse_timestamp(&self.created_at, "post", self.id),
            updated_at: parse_timestamp(&self.updated_at, "post", self.id),
            id: self.id,
            user_id: self.user_id,
            username: self.username,
            full_name: self.full_name,
            content: self.content,
            deleted: self.deleted,
            edited: self.edited,
            edited_by_admin: self.edited_by_admin,
            comment_count: self.comment_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub content: String,
    pub deleted: bool,
    pub edited: bool,
    pub edited_by_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CommentRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            post_id: row.get(1)?,
            user_id: row.get(2)?,
            username: row.get(3)?,
            full_name: row.get(4)?,
            content: row.get(5)?,
            deleted: row.get(6)?,
            edited: row.get(7)?,
            edited_by_admin: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    pub fn into_record(self) -> CommentRecord {
        CommentRecord {
            created_at: parse_timestamp(&self.created_at, "comment", self.id),
            updated_at: parse_timestamp(&self.updated_at, "comment", self.id),
            id: self.id,
            post_id: self.post_id,
            user_id: self.user_id,
            username: self.username,
            full_name: self.full_name,
            content: self.content,
            deleted: self.deleted,
            edited: self.edited,
            edited_by_admin: self.edited_by_admin,
        }
    }
}

fn parse_timestamp(raw: &str, kind: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!("Corrupt timestamp '{}' on {} {}: {}", raw, kind, id, e);
        DateTime::default()
    })
}
