//! Data models for the Violet community blog.
//!
//! Wire forms are camelCase JSON, matching the state shapes the browser
//! client persists and the upstream content provider serves.

mod comment;
mod notification;
mod post;
mod report;
mod user;

pub use comment::*;
pub use notification::*;
pub use post::*;
pub use report::*;
pub use user::*;
