use timeline_types::models::Role;

/// The authenticated identity behind a request, as resolved from its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The one row filter this requester reads through.
    pub fn visibility(&self) -> Visibility {
        if self.is_admin() {
            Visibility::Everything
        } else {
            Visibility::ActiveOnly
        }
    }
}

/// Row-level soft-delete filter. Applies to the rows being listed and to
/// child comments joined or counted onto a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Admin view: soft-deleted rows included, flags reported as stored.
    Everything,
    /// Everyone else: `deleted = false` on every row, children included.
    ActiveOnly,
}

impl Visibility {
    pub fn includes_deleted(self) -> bool {
        self == Self::Everything
    }
}

/// A mutation the requester wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Edit or soft-delete a post or comment owned by `owner_id`.
    ModifyContent { owner_id: i64 },
    /// Change another account's role.
    ManageUsers,
}

/// Why a mutation was allowed. Edit attribution depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Requester owns the row (admins acting on their own rows included).
    Owner,
    /// Requester is an admin acting on someone else's row.
    Moderator,
}

impl Grant {
    pub fn is_moderation(self) -> bool {
        self == Self::Moderator
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("user {requester} may not modify content owned by user {owner}")]
    NotOwner { requester: i64, owner: i64 },
    #[error("admin role required")]
    AdminRequired,
}

/// Single authorization gate for every mutating operation.
pub fn authorize(requester: &Requester, capability: Capability) -> Result<Grant, AccessDenied> {
    match capability {
        Capability::ModifyContent { owner_id } => {
            if requester.user_id == owner_id {
                Ok(Grant::Owner)
            } else if requester.is_admin() {
                Ok(Grant::Moderator)
            } else {
                Err(AccessDenied::NotOwner {
                    requester: requester.user_id,
                    owner: owner_id,
                })
            }
        }
        Capability::ManageUsers => {
            if requester.is_admin() {
                Ok(Grant::Moderator)
            } else {
                Err(AccessDenied::AdminRequired)
            }
        }
    }
}
