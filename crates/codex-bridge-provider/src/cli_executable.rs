//! Executable lookup for CLI templates.
//!
//! A template whose program cannot be found is recorded as a failed attempt
//! without spawning anything, so a missing tool falls through to the next
//! template instead of surfacing an opaque spawn error.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Resolves `program` the way a process spawn would: paths are checked
/// directly, bare names are searched on `PATH`.
pub(crate) fn resolve_executable(program: &str) -> Option<PathBuf> {
    resolve_executable_in(program, std::env::var_os("PATH").as_deref())
}

fn resolve_executable_in(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let trimmed = program.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = Path::new(trimmed);
    if candidate.is_absolute() || trimmed.contains(std::path::MAIN_SEPARATOR) {
        return is_executable_file(candidate).then(|| candidate.to_path_buf());
    }

    std::env::split_paths(path_var?)
        .map(|dir| dir.join(trimmed))
        .find(|path| is_executable_file(path))
}

pub fn is_executable_available(program: &str) -> bool {
    resolve_executable(program).is_some()
}
