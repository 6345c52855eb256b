// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable discovery for external tools.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Install locations that GUI-launched processes often lack in `PATH`
const EXTRA_SEARCH_DIRS: &[&str] = &["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} not found: {hint}")]
pub struct MissingExecutable {
    pub name: String,
    /// Remediation text for the user
    pub hint: String,
}

/// Locate `name`, preferring an explicitly configured path.
///
/// A configured path that is not an executable file is an error rather than a
/// fallback to `PATH`, so a typo in settings is not silently ignored.
pub fn locate(name: &str, configured: Option<&Path>) -> Result<PathBuf, MissingExecutable> {
    if let Some(path) = configured.filter(|p| !p.as_os_str().is_empty()) {
        if is_executable(path) {
            return Ok(path.to_path_buf());
        }
        return Err(MissingExecutable {
            name: name.to_string(),
            hint: format!(
                "configured path {} is not an executable file; fix the path in settings",
                path.display()
            ),
        });
    }

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&path_var)
        .chain(EXTRA_SEARCH_DIRS.iter().map(PathBuf::from))
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| MissingExecutable {
            name: name.to_string(),
            hint: format!("install {name} (e.g. `brew install {name}`) or set its path in settings"),
        })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "executable_tests.rs"]
mod tests;
