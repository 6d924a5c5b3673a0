//! Writing each group of matching tiers as a standalone JSON document.
//!
//! A group becomes `<dir>/<first tier>/<first file stem>.json`; a group
//! without units falls back to `<dir>/group-<index>.json`. When two units
//! share a tier name, the later one is renamed `<name>-<position>`. Tier
//! names and file stems are reduced to a single path component, so every
//! file lands below the export directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use accord_core::{Document, MultiRaterCombination, Tier};

use crate::error::Result;
use crate::naming::file_stem;

/// The document a group exports to.
#[must_use]
pub fn group_document(group: &MultiRaterCombination, path: impl Into<String>) -> Document {
    let mut seen = HashSet::new();
    let tiers = group
        .units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            let name = if seen.insert(unit.tier.clone()) {
                unit.tier.clone()
            } else {
                format!("{}-{}", unit.tier, i)
            };
            Tier::new(name, unit.segments.clone()).with_annotator(unit.annotator.clone())
        })
        .collect();
    Document::new(path, tiers)
}

/// Destination of group `index` below `dir`.
#[must_use]
pub fn group_path(dir: &Path, group: &MultiRaterCombination, index: usize) -> PathBuf {
    match group.units.first() {
        Some(first) => dir
            .join(path_component(&first.tier))
            .join(format!("{}.json", path_component(file_stem(&first.source)))),
        None => dir.join(format!("group-{index}.json")),
    }
}

/// A single, non-traversing path component for `name`.
fn path_component(name: &str) -> String {
    match name {
        "" | "." | ".." => "_".to_string(),
        _ => name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') || c.is_control() { '_' } else { c })
            .collect(),
    }
}

/// Write every group below `dir`, creating directories as needed.
///
/// A group that cannot be written is logged and skipped; the paths written
/// are returned in group order.
pub fn export_groups<'a, I>(dir: &Path, groups: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a MultiRaterCombination>,
{
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (index, group) in groups.into_iter().enumerate() {
        let path = group_path(dir, group, index);
        match write_group(&path, group) {
            Ok(()) => {
                log::debug!("Exported group {} to {}", index, path.display());
                written.push(path);
            }
            Err(e) => log::warn!("Could not export group {} to {}: {}", index, path.display(), e),
        }
    }
    Ok(written)
}

fn write_group(path: &Path, group: &MultiRaterCombination) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let doc = group_document(group, path.to_string_lossy());
    std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}
