//! Register command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;
use weftmark_core::{RecordStore, Registrar};

use crate::utils::{degraded_list, format_timestamp};

/// Execute the register command.
pub fn execute<S: RecordStore>(
    registrar: &Registrar<S>,
    image: &Path,
    id: Option<String>,
    quiet: bool,
) -> Result<()> {
    let registration = registrar
        .register(image, id)
        .with_context(|| format!("Failed to register {}", image.display()))?;

    let identity = &registration.identity;
    info!(item_id = %identity.item_id, "Registration complete");

    if !registration.degraded.is_empty() && !quiet {
        eprintln!(
            "{}",
            format!(
                "warning: degraded analyzer output for: {}",
                degraded_list(&registration.degraded)
            )
            .yellow()
        );
    }

    if quiet {
        println!("{}", identity.item_id);
        return Ok(());
    }

    println!();
    println!("{}", "Item registered".green().bold());
    println!();
    println!("   {} {}", "Item ID:".dimmed(), identity.item_id.bold());
    println!("   {} {}", "Features hash:".dimmed(), identity.features_hash);
    println!(
        "   {} {}",
        "Timestamp hash:".dimmed(),
        identity.timestamp_hash
    );
    println!("   {} {}", "Combined hash:".dimmed(), identity.combined_hash);
    println!(
        "   {} {}",
        "Algorithm:".dimmed(),
        identity.algorithm_version
    );
    println!(
        "   {} {}",
        "Created:".dimmed(),
        format_timestamp(identity.creation_time)
    );
    if let Some(reference) = &identity.image_reference {
        println!("   {} {}", "Image:".dimmed(), reference);
    }

    Ok(())
}
