//! Mapping request paths onto files under the document root.

use std::path::{Path, PathBuf};

/// Result of resolving a request path.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    /// A regular file inside the root.
    File(PathBuf),
    /// Missing, a directory, or otherwise not a regular file.
    NotFound,
    /// Exists, but resolves to somewhere outside the root.
    OutsideRoot(PathBuf),
}

/// The directory files are served from.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: String,
}

impl DocumentRoot {
    /// `root` must already be normalized (no trailing `/`).
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.root
    }

    /// The on-disk location for a normalized request path: plain
    /// concatenation of root and path, no decoding.
    pub fn candidate(&self, path: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.root, path))
    }

    /// Resolves `path` (which must start with `/`) to a regular file.
    ///
    /// Both the candidate and the root are canonicalized, so `..` segments
    /// and symlinks cannot reach files outside the root.
    pub async fn resolve(&self, path: &str) -> Lookup {
        let candidate = self.candidate(path);

        let Ok(resolved) = tokio::fs::canonicalize(&candidate).await else {
            return Lookup::NotFound;
        };

        match tokio::fs::metadata(&resolved).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Lookup::NotFound,
        }

        let Ok(base) = tokio::fs::canonicalize(self.base_dir()).await else {
            return Lookup::NotFound;
        };

        if resolved.starts_with(&base) {
            Lookup::File(resolved)
        } else {
            Lookup::OutsideRoot(resolved)
        }
    }

    fn base_dir(&self) -> &Path {
        if self.root.is_empty() {
            Path::new("/")
        } else {
            Path::new(&self.root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_is_plain_concatenation() {
        let root = DocumentRoot::new("/srv/www");
        assert_eq!(root.candidate("/a/b.html"), PathBuf::from("/srv/www/a/b.html"));
    }

    #[test]
    fn filesystem_root_is_empty_string() {
        let root = DocumentRoot::new("");
        assert_eq!(root.candidate("/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(root.base_dir(), Path::new("/"));
    }
}
