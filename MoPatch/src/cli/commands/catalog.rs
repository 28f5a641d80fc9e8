//! CLI commands for reading and checking catalogs

use std::path::{Path, PathBuf};

use console::style;

use crate::formats::mo::{CatalogCheck, HashTableCheck, read_catalog, verify_catalog_bytes};

/// List entries in a catalog
pub fn list(path: &Path, limit: Option<usize>) -> anyhow::Result<()> {
    let catalog = read_catalog(path)?;
    let limit = limit.unwrap_or(usize::MAX);

    let entries = catalog.entries.iter().filter(|e| !e.is_header());
    for entry in entries.take(limit) {
        println!("{}", entry.original);
        println!("  {}", truncate_text(&entry.translated, 100));
    }

    let header = usize::from(catalog.header().is_some());
    let shown = catalog.len().saturating_sub(header);
    if shown > limit {
        println!("\n({} of {} entries shown)", limit, shown);
    }
    Ok(())
}

/// Print one translation
pub fn get(path: &Path, id: &str) -> anyhow::Result<()> {
    let catalog = read_catalog(path)?;

    if let Some(entry) = catalog.get(id) {
        println!("{}", entry.translated);
    } else {
        anyhow::bail!("Message id not found: {}", id);
    }

    Ok(())
}

/// Verify one or more catalogs, failing if any is unusable
pub fn verify(paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut failed = 0;

    for path in paths {
        let check = match check_file(path) {
            Ok(check) => check,
            Err(e) => {
                println!("{} {}: {}", style("FAIL").red().bold(), path.display(), e);
                failed += 1;
                continue;
            }
        };

        let status = if check.is_valid() {
            style("OK").green().bold()
        } else {
            failed += 1;
            style("FAIL").red().bold()
        };
        println!("{} {}", status, path.display());
        println!("  Entries: {}", check.entries);
        println!(
            "  Byte order: {:?}, revision {}",
            check.endianness, check.revision
        );

        let hash = match &check.hash_table {
            HashTableCheck::Absent => "absent".to_string(),
            HashTableCheck::Valid { size } => format!("valid ({size} slots)"),
            HashTableCheck::OutOfBounds => "out of bounds".to_string(),
            HashTableCheck::Inconsistent { unreachable } => {
                format!("{} ids unreachable", unreachable.len())
            }
        };
        println!("  Hash table: {hash}");

        for id in check.out_of_order.iter().take(5) {
            println!("  Out of order: {id}");
        }
        for id in check.duplicates.iter().take(5) {
            println!("  Duplicate: {id}");
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} catalogs failed verification", failed, paths.len());
    }
    Ok(())
}

/// Read and check one catalog; unreadable files fail like malformed ones
fn check_file(path: &Path) -> anyhow::Result<CatalogCheck> {
    let data = std::fs::read(path)?;
    Ok(verify_catalog_bytes(&data)?)
}

/// Truncate text for display
pub(super) fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.replace('\n', "\\n");
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::mo::{Catalog, WriteOptions, write_catalog};
    use tempfile::TempDir;

    #[test]
    fn test_verify_reports_every_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.mo");
        let good = dir.path().join("good.mo");
        let catalog = Catalog::from_pairs([("", "Language: de\n"), ("IDS_A", "A")]);
        write_catalog(&good, &catalog, &WriteOptions::default()).unwrap();

        let err = verify(&[missing.clone(), good.clone()]).unwrap_err();
        assert!(err.to_string().contains("1 of 2"), "{err}");
        assert!(check_file(&missing).is_err());
        assert!(check_file(&good).unwrap().is_valid());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("a\nb", 10), "a\\nb");
        assert_eq!(truncate_text("abcdefghij", 6), "abc...");
    }
}
