//! Import resolution (C3): locating `import` targets on the search path and
//! building the tree of [`InputUnit`]s.

use crate::config::Configuration;
use crate::error::{Result, SupDefError};
use crate::normalize::normalize;
use crate::pragma::{scan_pragmas, LineItem, Pragma};
use crate::unit::InputUnit;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Read, normalise, and pragma-scan `path`, recursively resolving every
/// `import` it contains.
///
/// `stack` holds the canonical paths of units currently being resolved, and
/// is used to detect import cycles; it is empty for the initial call.
pub fn build_unit_tree(
    path: &Path,
    config: &Configuration,
    stack: &mut HashSet<PathBuf>,
) -> Result<InputUnit> {
    let canonical = canonicalize(path)?;
    if !stack.insert(canonical.clone()) {
        return Err(SupDefError::Cycle { path: canonical });
    }

    let raw = fs::read_to_string(path).map_err(|e| SupDefError::io(path, e))?;
    let normalized = normalize(&canonical, &raw)?;
    let items = scan_pragmas(&canonical, &normalized)?;

    let mut unit = InputUnit::new(canonical.clone(), normalized, items.clone());

    for item in &items {
        if let LineItem::Pragma {
            pragma: Pragma::Import { target },
            ..
        } = item
        {
            let resolved = resolve_import(target, &canonical, config)?;
            let child = build_unit_tree(&resolved, config, stack)?;
            unit.imports.push(child);
        }
    }

    stack.remove(&canonical);
    Ok(unit)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| SupDefError::io(path, e))
}

/// Resolve one `import` target from the unit at `from`, per §4.3:
/// search-path candidates take priority; exactly one match wins; otherwise
/// fall back to the importing file's own directory.
fn resolve_import(target: &str, from: &Path, config: &Configuration) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for search_dir in &config.search_paths {
        let candidate = search_dir.join(target);
        if candidate.is_file() {
            candidates.push(candidate);
        }
    }

    match candidates.len() {
        1 => Ok(candidates.into_iter().next().unwrap()),
        0 => fallback_to_importer_dir(target, from),
        count => Err(SupDefError::Ambiguous {
            target: target.to_string(),
            from: from.to_path_buf(),
            count,
        }),
    }
}

fn fallback_to_importer_dir(target: &str, from: &Path) -> Result<PathBuf> {
    let dir = from.parent().unwrap_or_else(|| Path::new("."));
    let candidate = dir.join(target);
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(SupDefError::NotFound {
            target: target.to_string(),
            from: from.to_path_buf(),
        })
    }
}
