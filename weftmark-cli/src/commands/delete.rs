//! Delete command implementation.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::info;
use weftmark_core::{RecordStore, Registrar};

/// Execute the delete command.
pub fn execute<S: RecordStore>(registrar: &Registrar<S>, id: &str, yes: bool) -> Result<()> {
    if registrar.identity(id)?.is_none() {
        bail!("item not found: {id}");
    }

    if !yes && !confirm(id)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    registrar.delete(id)?;
    info!(item_id = id, "Deleted item records");
    println!("{}", format!("Deleted {id}.").green());
    Ok(())
}

fn confirm(id: &str) -> Result<bool> {
    print!("Delete all records for {}? (y/N): ", id.bold());
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
