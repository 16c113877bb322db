//! Toggle command for flipping an activity's completion flag.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use cram_db::Database;

use crate::commands::util::{resolve_id, short_id};

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Activity ID or unique prefix.
    pub id: String,
}

pub fn run<W: Write>(writer: &mut W, db: &mut Database, args: &ToggleArgs) -> Result<()> {
    let id = resolve_id(db, &args.id)?;
    let Some(executed) = db.toggle_executed(&id)? else {
        bail!("activity not found: {id}");
    };
    let state = if executed { "done" } else { "pending" };
    writeln!(writer, "Marked {} as {state}", short_id(&id))?;
    Ok(())
}
