//! Timeline access policy
//!
//! Pure, storage-free rules shared by every request path:
//! - `access`: who may see which rows and who may mutate them
//! - `content`: the per-row edit/delete state machine
//! - `page`: page-size normalization and search-term parsing
//!
//! Nothing here touches the database, so the rules are identical no matter
//! which query or handler consults them.

pub mod access;
pub mod content;
pub mod page;

pub use access::{AccessDenied, Capability, Grant, Requester, Visibility, authorize};
pub use content::{ContentFlags, ContentState, TransitionError};
pub use page::{Page, PageRequest, SearchTerm, SearchTermError};
