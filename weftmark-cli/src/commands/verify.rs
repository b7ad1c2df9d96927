//! Verify command implementation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{error, info};
use weftmark_core::{RecordStore, Registrar};

use crate::utils::{degraded_list, percent};

/// Execute the verify command.
pub fn execute<S: RecordStore>(
    registrar: &Registrar<S>,
    id: &str,
    image: &Path,
    quiet: bool,
) -> Result<()> {
    let verification = registrar
        .verify(id, image)
        .with_context(|| format!("Failed to verify {}", image.display()))?;

    let Some(verification) = verification else {
        bail!("item not found: {id}");
    };

    let report = &verification.report;
    if !verification.degraded.is_empty() && !quiet {
        eprintln!(
            "{}",
            format!(
                "warning: degraded analyzer output for: {}",
                degraded_list(&verification.degraded)
            )
            .yellow()
        );
    }

    if !quiet {
        println!();
        println!("   {} {}", "Texture similarity:".dimmed(), percent(report.texture_sim));
        println!("   {} {}", "Pattern similarity:".dimmed(), percent(report.pattern_sim));
        println!(
            "   {} {}",
            "Dimension similarity:".dimmed(),
            percent(report.dimension_sim)
        );
        println!("   {} {}", "Total similarity:".dimmed(), percent(report.total).bold());
        println!();
    }

    if report.authentic {
        info!(item_id = id, total = report.total, "Candidate accepted");
        if !quiet {
            println!("{}", "╔════════════════════════════════════════╗".green());
            println!("{}", "║              AUTHENTIC                 ║".green().bold());
            println!("{}", "╚════════════════════════════════════════╝".green());
        } else {
            println!("AUTHENTIC");
        }
        Ok(())
    } else {
        error!(item_id = id, total = report.total, "Candidate rejected");
        if !quiet {
            println!("{}", "╔════════════════════════════════════════╗".red());
            println!("{}", "║            NOT AUTHENTIC               ║".red().bold());
            println!("{}", "╚════════════════════════════════════════╝".red());
            println!();
            println!(
                "   {}",
                "The item may have been altered or is not the original.".dimmed()
            );
        } else {
            println!("NOT AUTHENTIC");
        }
        bail!(
            "candidate is not authentic: total similarity {} below threshold",
            percent(report.total)
        )
    }
}
