//! CLI command for copying plan assets into the game directory

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{TRUCK, print_done, print_step, simple_bar};
use crate::config::PatchPlan;
use crate::install::{AssetCopy, OverwritePolicy, install_assets};

/// Copy every asset of the plan at `config`
pub fn execute(
    config: &Path,
    source_root: &Path,
    game_root: &Path,
    policy: OverwritePolicy,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let plan = PatchPlan::load(config)?;

    if plan.assets.is_empty() {
        println!("No assets listed in {}", config.display());
        return Ok(());
    }

    let report = if quiet {
        install_assets(source_root, game_root, &plan.assets, policy, &|_, _, _| {})?
    } else {
        let message = format!("Copying {} assets...", plan.assets.len());
        print_step(1, 1, TRUCK, &message);
        let pb = simple_bar(plan.assets.len() as u64, "Copying");
        let progress = |current: usize, _: usize, _: &AssetCopy| pb.set_position(current as u64);
        let result = install_assets(source_root, game_root, &plan.assets, policy, &progress);
        pb.finish_and_clear();
        result?
    };

    println!(
        "Copied: {}, overwritten: {}, skipped: {}",
        report.copied.len(),
        report.overwritten.len(),
        report.skipped.len()
    );
    if !quiet {
        print_done(started.elapsed());
    }
    Ok(())
}
