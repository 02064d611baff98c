//! Stored stack configurations, one JSON file per stack.

use crate::geometry::{Anchor, Direction};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const STACKS_DIR: &str = "Stacks";

static STACK_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Stack\s*(\d+)\.json$").expect("valid stack file regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfiguration {
    #[serde(default, alias = "StackNumberId")]
    pub id: u32,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "TargetFolderPath")]
    pub target_folder: String,
    #[serde(default, alias = "IconPath")]
    pub icon_path: Option<String>,
    #[serde(default, alias = "PosX")]
    pub x: f64,
    #[serde(default, alias = "PosY")]
    pub y: f64,
    #[serde(default, alias = "OpeningDirection")]
    pub direction: Direction,
}

impl Default for StackConfiguration {
    fn default() -> Self {
        let target_folder = dirs_next::desktop_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: 0,
            name: folder_display_name(&target_folder),
            target_folder,
            icon_path: None,
            x: 0.0,
            y: 200.0,
            direction: Direction::Right,
        }
    }
}

impl StackConfiguration {
    pub fn anchor(&self) -> Anchor {
        Anchor::new(self.x, self.y)
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.x = anchor.x;
        self.y = anchor.y;
    }

    /// Name shown in lists; falls back to the folder name.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            folder_display_name(&self.target_folder)
        } else {
            self.name.clone()
        }
    }
}

/// Last path component of `folder`, or the folder itself when it has none.
/// Both `/` and `\` separate components on every platform.
pub fn folder_display_name(folder: &str) -> String {
    folder
        .trim()
        .split(['/', '\\'])
        .rev()
        .find(|part| !part.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| folder.to_string())
}

/// Trailing separators stripped, lowercased.
pub fn normalize_folder(folder: &str) -> String {
    folder.trim().trim_end_matches(['/', '\\']).to_lowercase()
}

pub fn same_folder(a: &str, b: &str) -> bool {
    normalize_folder(a) == normalize_folder(b)
}

/// `Stacks` directory next to the executable.
pub fn default_stacks_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(STACKS_DIR)))
        .unwrap_or_else(|| PathBuf::from(STACKS_DIR))
}

pub fn stack_file_name(id: u32) -> String {
    format!("Stack {id}.json")
}

fn parse_stack_id(file_name: &str) -> Option<u32> {
    STACK_FILE_RE
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[derive(Debug, Clone)]
pub struct StackStore {
    root: PathBuf,
}

impl StackStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: u32) -> PathBuf {
        self.root.join(stack_file_name(id))
    }

    fn stack_files(&self) -> anyhow::Result<Vec<(u32, PathBuf)>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(id) = parse_stack_id(&name.to_string_lossy()) {
                out.push((id, entry.path()));
            }
        }
        Ok(out)
    }

    /// All readable stacks sorted by id. Unparsable files are skipped.
    pub fn load_all(&self) -> anyhow::Result<Vec<StackConfiguration>> {
        let mut stacks = Vec::new();
        for (id, path) in self.stack_files()? {
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read stack file");
                    continue;
                }
            };
            match serde_json::from_str::<StackConfiguration>(&content) {
                Ok(mut stack) => {
                    stack.id = id;
                    stacks.push(stack);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping invalid stack file");
                }
            }
        }
        stacks.sort_by_key(|s| s.id);
        Ok(stacks)
    }

    pub fn next_id(&self) -> anyhow::Result<u32> {
        let max = self.stack_files()?.into_iter().map(|(id, _)| id).max().unwrap_or(0);
        Ok(max + 1)
    }

    /// Write `stack`, assigning a fresh id when it has none.
    pub fn save(&self, stack: &mut StackConfiguration) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        if stack.id == 0 {
            stack.id = self.next_id()?;
        }
        let path = self.path_for(stack.id);
        let json = serde_json::to_string_pretty(stack)?;
        std::fs::write(&path, json)?;
        tracing::info!(id = stack.id, path = %path.display(), "saved stack");
        Ok(path)
    }

    /// Returns `true` when a file was removed.
    pub fn delete(&self, id: u32) -> anyhow::Result<bool> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        tracing::info!(id, "deleted stack");
        Ok(true)
    }

    pub fn find_by_folder(&self, folder: &str) -> anyhow::Result<Option<StackConfiguration>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|s| same_folder(&s.target_folder, folder)))
    }
}
