//! CLI subcommand implementations.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod report;
pub mod timeline;
pub mod toggle;
pub mod util;
