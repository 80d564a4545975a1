//! File-system validation rules
//!
//! These rules stat the path named by a string value; they are the only
//! rules that perform I/O. Any I/O failure becomes a validation error, never
//! a panic or a propagated error.

use std::fs;
use std::path::Path;

use super::{value_rule, Rule};
use crate::result::ValidationError;

/// Path exists (file or directory)
pub fn exists() -> Rule<String> {
    value_rule(
        |v: &String| Path::new(v).exists(),
        |name, v| {
            ValidationError::new(name, "Path does not exist")
                .with_actual(v.clone())
                .with_expected("Existing path")
                .with_code("fs.exists")
        },
    )
}

/// Path exists and is a regular file
pub fn file_exists() -> Rule<String> {
    value_rule(
        |v: &String| Path::new(v).is_file(),
        |name, v| {
            ValidationError::new(name, "File does not exist")
                .with_actual(v.clone())
                .with_expected("Existing file")
                .with_code("fs.file_exists")
        },
    )
}

/// Path exists and is a directory
pub fn directory_exists() -> Rule<String> {
    value_rule(
        |v: &String| Path::new(v).is_dir(),
        |name, v| {
            ValidationError::new(name, "Directory does not exist")
                .with_actual(v.clone())
                .with_expected("Existing directory")
                .with_code("fs.directory_exists")
        },
    )
}

/// Path is a regular file (fails for directories and missing paths)
pub fn is_file() -> Rule<String> {
    value_rule(
        |v: &String| Path::new(v).is_file(),
        |name, v| {
            ValidationError::new(name, "Path is not a regular file")
                .with_actual(v.clone())
                .with_expected("Regular file")
                .with_code("fs.is_file")
        },
    )
}

/// Path is a directory (fails for files and missing paths)
pub fn is_directory() -> Rule<String> {
    value_rule(
        |v: &String| Path::new(v).is_dir(),
        |name, v| {
            ValidationError::new(name, "Path is not a directory")
                .with_actual(v.clone())
                .with_expected("Directory")
                .with_code("fs.is_directory")
        },
    )
}

/// Path can be opened for reading
pub fn readable() -> Rule<String> {
    value_rule(
        |v: &String| {
            let path = Path::new(v);
            if path.is_dir() {
                fs::read_dir(path).is_ok()
            } else {
                fs::File::open(path).is_ok()
            }
        },
        |name, v| {
            ValidationError::new(name, "Path is not readable")
                .with_actual(v.clone())
                .with_expected("Readable path")
                .with_code("fs.readable")
        },
    )
}

/// Path exists and is not read-only
pub fn writable() -> Rule<String> {
    value_rule(
        |v: &String| {
            fs::metadata(v)
                .map(|m| !m.permissions().readonly())
                .unwrap_or(false)
        },
        |name, v| {
            ValidationError::new(name, "Path is not writable")
                .with_actual(v.clone())
                .with_expected("Writable path")
                .with_code("fs.writable")
        },
    )
}

/// Path exists and carries an execute permission bit
pub fn executable() -> Rule<String> {
    value_rule(
        |v: &String| is_executable(Path::new(v)),
        |name, v| {
            ValidationError::new(name, "Path is not executable")
                .with_actual(v.clone())
                .with_expected("Executable path")
                .with_code("fs.executable")
        },
    )
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.exists()
}

/// Path is a directory with no entries
pub fn is_empty_directory() -> Rule<String> {
    value_rule(
        |v: &String| {
            fs::read_dir(v)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false)
        },
        |name, v| {
            ValidationError::new(name, "Path is not an empty directory")
                .with_actual(v.clone())
                .with_expected("Empty directory")
                .with_code("fs.is_empty_directory")
        },
    )
}

/// Path has the given extension, compared case-insensitively
///
/// The expected extension may be given with or without a leading dot.
pub fn has_extension(extension: impl Into<String>) -> Rule<String> {
    let extension = extension.into();
    let normalized = extension.trim_start_matches('.').to_string();
    let expected = normalized.clone();
    value_rule(
        move |v: &String| {
            Path::new(v)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(&normalized))
                .unwrap_or(false)
        },
        move |name, v| {
            ValidationError::new(name, format!("Path must have extension '.{}'", expected))
                .with_actual(v.clone())
                .with_expected(format!(".{} file", expected))
                .with_code("fs.has_extension")
        },
    )
}

/// File size in bytes falls within `min..=max`
///
/// Fails for missing paths and directories.
pub fn file_size_between(min: u64, max: u64) -> Rule<String> {
    let range = format!("{}-{} bytes", min, max);
    value_rule(
        move |v: &String| {
            fs::metadata(v)
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len() >= min && m.len() <= max)
                .unwrap_or(false)
        },
        move |name, v| {
            ValidationError::new(name, format!("File size must be within {}", range))
                .with_actual(v.clone())
                .with_expected(range.clone())
                .with_code("fs.file_size_between")
        },
    )
}
