//! Directory listing for the script browser

use std::fs;
use std::path::Path;

use crate::error::{RecoveryError, Result};
use crate::menu::{Menu, MenuItem};

const SCRIPT_SUFFIX: &str = ".sh";

/// Listing behaviour, taken from `[general]` in the config
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Sort rows by name instead of keeping enumeration order
    pub sort: bool,
    /// Prepend a `..` row leading to the parent directory
    pub show_parent: bool,
}

/// Build a menu of sub-directories and `.sh` scripts found in `path`.
///
/// Other files are left out. An empty directory gives an empty menu; a path
/// that cannot be opened is an error.
pub fn list(path: &Path, options: ListOptions) -> Result<Menu> {
    let entries = fs::read_dir(path).map_err(|e| RecoveryError::io(path, e))?;

    let mut items = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let entry_path = entry.path();

        if is_dir(&entry) {
            items.push(MenuItem::directory(name, entry_path));
        } else if name.ends_with(SCRIPT_SUFFIX) {
            items.push(MenuItem::script(name, entry_path));
        }
    }

    if options.sort {
        items.sort_by(|a, b| a.label().cmp(b.label()));
    }

    if options.show_parent {
        if let Some(parent) = path.parent() {
            items.insert(0, MenuItem::directory("..", parent));
        }
    }

    tracing::debug!("Listed {} entries in {}", items.len(), path.display());
    Ok(Menu::new(path.display().to_string(), items))
}

// Symlinks count as whatever they point at.
fn is_dir(entry: &fs::DirEntry) -> bool {
    match entry.file_type() {
        Ok(ft) if ft.is_symlink() => fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false),
        Ok(ft) => ft.is_dir(),
        Err(_) => false,
    }
}
