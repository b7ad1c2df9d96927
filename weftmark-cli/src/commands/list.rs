//! List command implementation.

use anyhow::Result;
use colored::Colorize;
use weftmark_core::{RecordStore, Registrar};

use crate::utils::format_timestamp;

/// Execute the list command.
pub fn execute<S: RecordStore>(registrar: &Registrar<S>) -> Result<()> {
    let ids = registrar.list()?;
    if ids.is_empty() {
        println!("No items registered.");
        return Ok(());
    }

    for (index, id) in ids.iter().enumerate() {
        println!("{}. {}", index + 1, id.bold());
        // A listed id always has an identity record; tolerate a racing
        // delete.
        if let Some(identity) = registrar.identity(id)? {
            println!(
                "   {} {}",
                "Created:".dimmed(),
                format_timestamp(identity.creation_time)
            );
            println!("   {} {}", "Hash:".dimmed(), identity.combined_hash);
            if let Some(reference) = &identity.image_reference {
                println!("   {} {}", "Image:".dimmed(), reference);
            }
        }
        println!();
    }

    Ok(())
}
