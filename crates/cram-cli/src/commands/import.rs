//! Import command for loading activities from a JSON file.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cram_db::{Database, activities_from_json};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file holding an array of activities, or "-" for stdin.
    pub file: PathBuf,
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut contents = String::new();
        io::stdin()
            .read_to_string(&mut contents)
            .context("failed to read stdin")?;
        return Ok(contents);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

/// Imports activities, replacing stored ones that share an ID.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, args: &ImportArgs) -> Result<usize> {
    let contents = read_input(&args.file)?;
    let activities = activities_from_json(&contents)
        .with_context(|| format!("invalid activity data in {}", args.file.display()))?;
    let imported = db.import(&activities)?;
    writeln!(writer, "Imported {imported} activities")?;
    Ok(imported)
}
