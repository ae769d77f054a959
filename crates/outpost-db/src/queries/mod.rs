//! One query module per table, all taking `&PgPool` and returning
//! `anyhow::Result` with context attached at the call site.

pub mod accounts;
pub mod call_center;
pub mod calls;
pub mod groups;
pub mod media;
pub mod plans;
pub mod prospects;
pub mod tasks;
pub mod templates;
