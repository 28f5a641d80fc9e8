//! CLI command for applying a patch plan to a catalog

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{print_done, print_patch_step};
use crate::config::PatchPlan;
use crate::patch::{Notice, PatchPhase, patch_catalog_with_options};

use super::catalog::truncate_text;

/// Patch a catalog with the rules in `config`
pub fn execute(
    config: &Path,
    catalog: Option<&Path>,
    no_hash_table: bool,
    dry_run: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let plan = PatchPlan::load(config)?;
    let catalog_path = plan.catalog_path(catalog)?;

    let mut options = plan.patch_options();
    options.dry_run = dry_run;
    if no_hash_table {
        options.hash_table = false;
    }

    let rules = plan.override_rules();
    let report = if quiet {
        patch_catalog_with_options(&catalog_path, &rules, &options, &|_| {})?
    } else {
        patch_catalog_with_options(&catalog_path, &rules, &options, &print_patch_step)?
    };

    if !quiet {
        println!();
        println!(
            "Entries: {} read, {} written",
            report.entries_read, report.entries_written
        );
        println!("Patched: {}", report.patched.len());
        for id in report.patched.iter().take(10) {
            println!("  {id}");
        }
        if report.patched.len() > 10 {
            println!("  ... and {} more", report.patched.len() - 10);
        }
    }

    if !report.unmatched_rules.is_empty() {
        let unmatched = report.unmatched_rules.len();
        println!("Rules without a matching entry: {unmatched}");
        for id in report.unmatched_rules.iter().take(5) {
            println!("  - {id}");
        }
    }

    for notice in &report.notices {
        match notice {
            Notice::DuplicatePolicyApplied { original, phase } => {
                let action = if *phase == PatchPhase::Serializing {
                    "dropped"
                } else {
                    "not patched"
                };
                let id = truncate_text(original, 60);
                println!("Duplicate id {id}: later occurrence {action}");
            }
            Notice::HeaderRuleIgnored => {
                println!("Rule targeting the catalog header was ignored");
            }
            Notice::ShadowedRule { target_id } => {
                println!("Rule for {target_id} shadowed by an earlier rule");
            }
        }
    }

    if dry_run {
        println!("\n(Dry run - {} not modified)", catalog_path.display());
    } else if !quiet {
        print_done(started.elapsed());
    }

    Ok(())
}
