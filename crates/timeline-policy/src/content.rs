use crate::access::Grant;

/// The three mutable flags every post and comment carries.
///
/// Invariant: `edited_by_admin` implies `edited`. Both constructors and
/// transitions preserve it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFlags {
    pub deleted: bool,
    pub edited: bool,
    pub edited_by_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentState {
    Active,
    Edited,
    EditedByAdmin,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("deleted content cannot be edited")]
    Deleted,
}

impl ContentFlags {
    pub fn new(deleted: bool, edited: bool, edited_by_admin: bool) -> Self {
        Self {
            deleted,
            edited: edited || edited_by_admin,
            edited_by_admin,
        }
    }

    pub fn state(&self) -> ContentState {
        if self.deleted {
            ContentState::Deleted
        } else if self.edited_by_admin {
            ContentState::EditedByAdmin
        } else if self.edited {
            ContentState::Edited
        } else {
            ContentState::Active
        }
    }

    /// Flags after a content edit authorized by `grant`.
    ///
    /// `edited_by_admin` only ever goes from false to true; a later owner
    /// edit leaves it set.
    pub fn after_edit(self, grant: Grant) -> Result<Self, TransitionError> {
        if self.deleted {
            return Err(TransitionError::Deleted);
        }
        Ok(Self {
            deleted: false,
            edited: true,
            edited_by_admin: self.edited_by_admin || grant.is_moderation(),
        })
    }

    /// Flags after a soft delete. Deleting twice is a no-op.
    pub fn after_delete(self) -> Self {
        Self {
            deleted: true,
            ..self
        }
    }
}
