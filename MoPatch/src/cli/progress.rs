//! CLI progress display utilities
//!
//! Step indicators for the catalog pipeline and a bar for asset installs.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::patch::{PatchPhase, PatchProgress};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Gear - for processing operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Package - for encoding operations
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Truck - for asset copies
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/4] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Render a patch progress update as a step line
pub fn print_patch_step(progress: &PatchProgress) {
    let emoji = match progress.phase {
        PatchPhase::ReadingCatalog => LOOKING_GLASS,
        PatchPhase::ApplyingRules => GEAR,
        PatchPhase::Serializing => PACKAGE,
        PatchPhase::Replacing => DISK,
        // Completion is reported by `print_done`
        PatchPhase::Complete => return,
    };
    let msg = progress
        .message
        .clone()
        .unwrap_or_else(|| format!("{}...", progress.phase.as_str()));
    print_step(progress.current, progress.total, emoji, &msg);
}

// =============================================================================
// Progress Bars
// =============================================================================

/// Progress bar style for determinate progress
///
/// Format: `Copying [████████░░░░░░░░] 50/100`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}
