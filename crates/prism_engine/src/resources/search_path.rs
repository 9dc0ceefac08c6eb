//! Resource search path
//!
//! An append-only list of directories that relative resource paths are
//! resolved against, in insertion order. Appending does not validate that the
//! directory exists; a bad entry simply never matches.

use std::path::{Path, PathBuf};

/// Ordered directory list for resource resolution.
#[derive(Debug, Default, Clone)]
pub struct SearchPath {
    directories: Vec<PathBuf>,
}

impl SearchPath {
    /// Create an empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory. No existence check is performed.
    pub fn append(&mut self, directory: impl Into<PathBuf>) {
        self.directories.push(directory.into());
    }

    /// The directories in resolution order.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Resolve `path` to an existing file.
    ///
    /// Absolute paths are only checked for existence. Relative paths are
    /// probed against each directory in order, then against the working
    /// directory as a last resort.
    pub fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }
        for directory in &self.directories {
            let candidate = directory.join(path);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        path.exists().then(|| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("prism-search-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn directories_are_probed_in_append_order() {
        let first = scratch_dir("first");
        let second = scratch_dir("second");
        fs::write(first.join("shared.txt"), b"one").unwrap();
        fs::write(second.join("shared.txt"), b"two").unwrap();
        fs::write(second.join("only.txt"), b"two").unwrap();

        let mut search = SearchPath::new();
        search.append(&first);
        search.append(&second);

        assert_eq!(
            search.resolve(Path::new("shared.txt")).unwrap(),
            first.join("shared.txt")
        );
        assert_eq!(
            search.resolve(Path::new("only.txt")).unwrap(),
            second.join("only.txt")
        );
        assert!(search.resolve(Path::new("missing.txt")).is_none());

        fs::remove_dir_all(first).ok();
        fs::remove_dir_all(second).ok();
    }

    #[test]
    fn append_accepts_nonexistent_directories() {
        let mut search = SearchPath::new();
        search.append("/definitely/not/here");
        assert_eq!(search.directories().len(), 1);
        assert!(search.resolve(Path::new("anything.png")).is_none());
    }
}
