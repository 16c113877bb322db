//! Delete command.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use cram_db::Database;

use crate::commands::util::{resolve_id, short_id};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Activity ID or unique prefix.
    pub id: String,
}

pub fn run<W: Write>(writer: &mut W, db: &mut Database, args: &DeleteArgs) -> Result<()> {
    let id = resolve_id(db, &args.id)?;
    if !db.delete(&id)? {
        bail!("activity not found: {id}");
    }
    writeln!(writer, "Deleted {}", short_id(&id))?;
    Ok(())
}
