//! One-shot, synchronous reads against sysfs (or a fixture tree standing
//! in for it in tests).

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{Error, Result};

/// Default mount point for PMU device nodes.
pub const DEFAULT_BASE: &str = "/sys/bus/event_source/devices";

/// The sysfs root this crate walks. Defaults to [`DEFAULT_BASE`]; tests
/// and non-standard mount namespaces can point it at a fixture directory.
#[derive(Debug, Clone)]
pub struct SysfsRoot {
    base: PathBuf,
}

impl Default for SysfsRoot {
    fn default() -> Self {
        SysfsRoot {
            base: PathBuf::from(DEFAULT_BASE),
        }
    }
}

impl SysfsRoot {
    /// Use the given directory as the PMU device root instead of
    /// [`DEFAULT_BASE`].
    pub fn at(base: impl Into<PathBuf>) -> Self {
        SysfsRoot { base: base.into() }
    }

    pub fn path(&self) -> &Path {
        &self.base
    }

    pub fn join(&self, parts: &[&str]) -> PathBuf {
        let mut p = self.base.clone();
        for part in parts {
            p.push(part);
        }
        p
    }

    /// Does this path exist at all (file or directory)?
    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Read a file's contents as a string, truncated at the first `\n`.
    pub fn read_first_line(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            debug!("sysfs node missing: {}", path.display());
            return Err(Error::MissingSysfsNode(path.to_owned()));
        }

        let content = fs::read_to_string(path).map_err(|source| {
            debug!("sysfs i/o error on {}: {}", path.display(), source);
            Error::Io {
                path: path.to_owned(),
                source,
            }
        })?;

        let line = content.split('\n').next().unwrap_or("").to_owned();
        trace!("read {} -> {:?}", path.display(), line);
        Ok(line)
    }

    /// List the entries of a directory, filtering out `.` and `..`.
    pub fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            debug!("sysfs directory missing: {}", path.display());
            return Err(Error::MissingSysfsNode(path.to_owned()));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })? {
            let entry = entry.map_err(|source| Error::Io {
                path: path.to_owned(),
                source,
            })?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == "." || name == ".." {
                continue;
            }
            names.push(name.into_owned());
        }
        trace!("listed {} -> {} entries", path.display(), names.len());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self as stdfs, File};
    use std::io::Write;

    #[test]
    fn read_first_line_truncates_at_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("type");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "4").unwrap();
        writeln!(f, "garbage").unwrap();

        let root = SysfsRoot::at(dir.path());
        assert_eq!(root.read_first_line(&path).unwrap(), "4");
    }

    #[test]
    fn read_first_line_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let root = SysfsRoot::at(dir.path());
        let path = dir.path().join("nope");
        assert!(matches!(
            root.read_first_line(&path),
            Err(Error::MissingSysfsNode(_))
        ));
    }

    #[test]
    fn list_dir_skips_dot_entries() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir(dir.path().join("cpu")).unwrap();
        stdfs::create_dir(dir.path().join("uncore_cbox_0")).unwrap();

        let root = SysfsRoot::at(dir.path());
        let mut entries = root.list_dir(dir.path()).unwrap();
        entries.sort();
        assert_eq!(entries, vec!["cpu", "uncore_cbox_0"]);
    }
}
