//! Listing and opening the contents of a stack's target folder.

use crate::error::RevealError;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderItem {
    /// File name without extension.
    pub name: String,
    pub path: PathBuf,
}

#[cfg(windows)]
fn is_hidden(_path: &Path, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(path: &Path, _metadata: &Metadata) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Visible regular files directly inside `folder`, sorted by name ignoring
/// case. A missing folder yields an empty list.
pub fn list_visible_files(folder: &Path) -> anyhow::Result<Vec<FolderItem>> {
    if !folder.is_dir() {
        tracing::debug!(folder = %folder.display(), "stack folder missing");
        return Ok(Vec::new());
    }
    let mut items = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !metadata.is_file() || is_hidden(&path, &metadata) {
            continue;
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.file_name().to_string_lossy().into_owned());
        items.push(FolderItem { name, path });
    }
    items.sort_by_cached_key(|item| item.name.to_lowercase());
    Ok(items)
}

/// Opens a bubble item with whatever the desktop associates with it.
pub trait ItemOpener {
    fn open(&self, path: &Path) -> Result<(), RevealError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl ItemOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), RevealError> {
        open::that(path).map_err(|source| RevealError::ContentOpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "opened item");
        Ok(())
    }
}
