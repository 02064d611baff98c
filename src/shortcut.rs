//! Desktop shortcuts that launch a single stack bubble.

use crate::launch::OPEN_STACK_FLAG;
use crate::stacks::StackConfiguration;
use std::path::{Path, PathBuf};

pub const SHORTCUT_EXT: &str = "lnk";

/// What to do when a shortcut with the same name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Replace,
    KeepBoth,
}

/// `name` with characters that are invalid in file names replaced by `_`.
pub fn shortcut_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "Stack".to_string()
    } else {
        cleaned
    }
}

pub fn shortcut_arguments(folder: &str) -> String {
    format!("{OPEN_STACK_FLAG} \"{}\"", folder.trim_end_matches(['/', '\\']))
}

pub fn shortcut_exists(dir: &Path, name: &str) -> bool {
    dir.join(format!("{}.{SHORTCUT_EXT}", shortcut_file_name(name))).exists()
}

/// Path the shortcut for `name` should be written to under `dir`.
pub fn resolve_shortcut_path(dir: &Path, name: &str, policy: ConflictPolicy) -> PathBuf {
    let base = shortcut_file_name(name);
    let first = dir.join(format!("{base}.{SHORTCUT_EXT}"));
    if policy == ConflictPolicy::Replace || !first.exists() {
        return first;
    }
    (2u32..)
        .map(|n| dir.join(format!("{base} ({n}).{SHORTCUT_EXT}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Directory holding the running executable.
pub fn program_dir() -> Option<PathBuf> {
    std::env::current_exe().ok()?.parent().map(Path::to_path_buf)
}

pub fn desktop_dir() -> Option<PathBuf> {
    dirs_next::desktop_dir()
}

/// Write a shortcut for `stack` into `dir` and return its path.
pub fn create_shortcut(
    stack: &StackConfiguration,
    dir: &Path,
    policy: ConflictPolicy,
) -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let link = resolve_shortcut_path(dir, &stack.display_name(), policy);
    let icon = stack
        .icon_path
        .as_deref()
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .unwrap_or_else(|| exe.clone());
    let description = format!("Stack '{}'", stack.display_name());
    write_shell_link(
        &link,
        &exe,
        &shortcut_arguments(&stack.target_folder),
        &description,
        &icon,
    )?;
    tracing::info!(path = %link.display(), "created shortcut");
    Ok(link)
}

#[cfg(windows)]
fn write_shell_link(
    link: &Path,
    target: &Path,
    arguments: &str,
    description: &str,
    icon: &Path,
) -> anyhow::Result<()> {
    use windows::core::{Interface, HSTRING};
    use windows::Win32::Foundation::BOOL;
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

    unsafe {
        let init = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
        let result = (|| -> windows::core::Result<()> {
            let shell_link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)?;
            shell_link.SetPath(&HSTRING::from(target.as_os_str()))?;
            shell_link.SetArguments(&HSTRING::from(arguments))?;
            shell_link.SetDescription(&HSTRING::from(description))?;
            shell_link.SetIconLocation(&HSTRING::from(icon.as_os_str()), 0)?;
            if let Some(dir) = target.parent() {
                shell_link.SetWorkingDirectory(&HSTRING::from(dir.as_os_str()))?;
            }
            let file: IPersistFile = shell_link.cast()?;
            file.Save(&HSTRING::from(link.as_os_str()), BOOL::from(true))?;
            Ok(())
        })();
        if init.is_ok() {
            CoUninitialize();
        }
        result.map_err(|e| anyhow::anyhow!("failed to write shortcut {}: {e}", link.display()))
    }
}

#[cfg(not(windows))]
fn write_shell_link(
    link: &Path,
    _target: &Path,
    _arguments: &str,
    _description: &str,
    _icon: &Path,
) -> anyhow::Result<()> {
    anyhow::bail!("shortcuts are only supported on Windows ({})", link.display())
}
