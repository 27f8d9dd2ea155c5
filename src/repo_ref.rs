// Parsing of `owner/repo[:path]` references.

use std::fmt;
use std::path::Path;

/// Argument to `ls` that lists the user's repositories instead of a path.
pub const LIST_REPOS_SENTINEL: &str = ":.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// `owner/name`.
    pub full_name: String,
    /// Path inside the repository; empty means the root.
    pub path: String,
}

impl RepoRef {
    /// Split `raw` on the first `:`. The repository part must be non-empty
    /// and contain a `/`.
    pub fn parse(raw: &str) -> Option<RepoRef> {
        let (full_name, path) = raw.split_once(':').unwrap_or((raw, ""));
        if full_name.is_empty() || !full_name.contains('/') {
            return None;
        }
        Some(RepoRef {
            full_name: full_name.to_string(),
            path: path.to_string(),
        })
    }

    /// Remote path for uploading `local_file` to this reference.
    ///
    /// An empty path means the repository root, and a trailing `/` names a
    /// directory; both keep the local file name.
    pub fn target_for(&self, local_file: &Path) -> String {
        let base = local_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.path.is_empty() {
            base
        } else if self.path.ends_with('/') {
            join_remote(&self.path, &base)
        } else {
            self.path.clone()
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}:{}", self.full_name, path)
    }
}

/// Join a remote directory and a relative path with `/`.
pub fn join_remote(base: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        relative
    } else {
        format!("{base}/{relative}")
    }
}
