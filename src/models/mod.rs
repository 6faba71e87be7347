//! Data models for the task manager.
//!
//! Wire names match the frontend TypeScript interfaces (camelCase).

mod due;
mod list;
mod note;
mod tag;
mod task;
mod user;

pub use due::*;
pub use list::*;
pub use note::*;
pub use tag::*;
pub use task::*;
pub use user::*;

/// Treat empty or whitespace-only optional strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
