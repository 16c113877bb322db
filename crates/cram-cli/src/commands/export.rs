//! Export command: dumps every stored activity as a JSON array.

use std::io::Write;

use anyhow::Result;
use cram_db::{Database, activities_to_json};

pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<usize> {
    let activities = db.load()?;
    writeln!(writer, "{}", activities_to_json(&activities)?)?;
    tracing::debug!(count = activities.len(), "exported activities");
    Ok(activities.len())
}
