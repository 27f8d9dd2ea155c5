//! `gitup copy <src> <dst>`
//!
//! The direction is guessed from the source: anything containing a `:`
//! that does not start with `.` is a remote reference and the copy is a
//! download; everything else is a local path and the copy is an upload.
//! A source such as `docs:v2` is ambiguous when it also exists locally.
//! The guess is kept, and a warning tells the user how to force an upload.

use super::{invalid_repo_format, Context};
use crate::api::{Contents, Entry, RemoteContent, Repository};
use crate::error::{GitupError, Result};
use crate::repo_ref::{join_remote, RepoRef};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use walkdir::WalkDir;

const USAGE: [&str; 4] = [
    "Usage: gitup copy <source> <destination>",
    "Examples:",
    "  Upload: gitup copy ./folder user/repo:remote_folder",
    "  Download: gitup copy user/repo:file.txt ./local/",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

pub fn direction(src: &str) -> Direction {
    if src.contains(':') && !src.starts_with('.') {
        Direction::Download
    } else {
        Direction::Upload
    }
}

pub fn execute(ctx: &mut Context<'_>, src: &str, dst: &str) -> Result<()> {
    if src.is_empty() {
        return Err(GitupError::usage("Source not specified", USAGE));
    }
    if dst.is_empty() {
        return Err(GitupError::usage("Destination not specified", USAGE));
    }

    match direction(src) {
        Direction::Upload => upload(ctx, src, dst),
        Direction::Download => {
            if Path::new(src).exists() {
                tracing::warn!(src, "source exists locally but is treated as remote");
                ctx.console.warn(&format!(
                    "{src} exists locally but is read as a repository reference; use ./{src} to upload it"
                ));
            }
            download(ctx, src, dst)
        }
    }
}

fn upload(ctx: &mut Context<'_>, src: &str, dst: &str) -> Result<()> {
    let repo_ref = RepoRef::parse(dst).ok_or_else(|| {
        invalid_repo_format(
            "Invalid destination repository format",
            &[
                "For upload, destination must be: user/repo[:path]",
                "Example: gitup copy ./myfile.txt user/myrepo:folder/",
            ],
        )
    })?;

    let local = Path::new(src);
    if !local.exists() {
        return Err(GitupError::usage(
            format!("Source not found: {src}"),
            ["Please verify the file or folder path"],
        ));
    }
    if !local.is_dir() && !local.is_file() {
        return Err(GitupError::usage(format!("Invalid source: {src}"), USAGE));
    }

    let remote = ctx.remote()?;
    let repo = ctx.open_repository(remote.as_ref(), &repo_ref.full_name)?;

    if local.is_file() {
        let dest = repo_ref.target_for(local);
        return ctx.upload_file(remote.as_ref(), &repo, local, &dest);
    }

    let files = collect_files(local)?;
    let count = files.len();
    ctx.with_progress(&format!("Uploading {count} files..."), || {
        upload_tree(remote.as_ref(), &repo, &repo_ref.path, &files)
    })?;
    ctx.console
        .success(&format!("Uploaded {count} files to {}", repo.full_name));
    Ok(())
}

/// Upload every file in order. Stops at the first failure; files already
/// sent stay on the remote.
fn upload_tree(
    remote: &dyn RemoteContent,
    repo: &Repository,
    base: &str,
    files: &[(PathBuf, String)],
) -> Result<()> {
    for (path, relative) in files {
        let dest = join_remote(base, relative);
        let bytes = super::read_local(path)?;
        super::upsert_file(remote, repo, &dest, &bytes)?;
    }
    Ok(())
}

/// All regular files under `root`, paired with their `/`-separated path
/// relative to `root`, in a stable order.
pub fn collect_files(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| GitupError::io(root, e.into()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((path.to_path_buf(), relative));
    }
    Ok(files)
}

fn download(ctx: &mut Context<'_>, src: &str, dst: &str) -> Result<()> {
    let repo_ref = RepoRef::parse(src).ok_or_else(|| {
        invalid_repo_format(
            "Invalid source repository format",
            &[
                "For download, source must be: user/repo:path",
                "Example: gitup copy user/myrepo:file.txt ./local/",
            ],
        )
    })?;

    let remote = ctx.remote()?;
    let repo = ctx.open_repository(remote.as_ref(), &repo_ref.full_name)?;

    let contents = ctx.with_progress(&format!("Downloading from {repo_ref}..."), || {
        remote.get_contents(&repo, &repo_ref.path)
    })?;

    match contents {
        Contents::Dir(entries) => {
            let dir = Path::new(dst);
            std::fs::create_dir_all(dir).map_err(|e| GitupError::io(dir, e))?;

            let (files, skipped): (Vec<Entry>, Vec<Entry>) =
                entries.into_iter().partition(Entry::is_file);
            ctx.with_progress(&format!("Downloading {} files...", files.len()), || {
                for entry in &files {
                    let bytes = fetch_file(remote.as_ref(), &repo, entry)?;
                    write_local(&dir.join(&entry.name), &bytes)?;
                }
                Ok(())
            })?;

            ctx.console
                .success(&format!("Downloaded {} files to {dst}", files.len()));
            if !skipped.is_empty() {
                let names: Vec<&str> = skipped.iter().map(|e| e.name.as_str()).collect();
                ctx.console
                    .dim(&format!("Skipped (not files): {}", names.join(", ")));
            }
        }
        Contents::File(entry) => {
            let target = local_target(dst, &entry.name);
            let bytes = ctx.with_progress(&format!("Downloading {}...", entry.name), || {
                file_bytes(remote.as_ref(), &repo, &entry)
            })?;
            write_local(&target, &bytes)?;
            ctx.console.success(&format!(
                "Downloaded {} to {}",
                entry.name,
                target.display()
            ));
        }
    }
    Ok(())
}

/// Listings carry no content, so each file is read on its own.
fn fetch_file(remote: &dyn RemoteContent, repo: &Repository, entry: &Entry) -> Result<Vec<u8>> {
    match remote.get_contents(repo, &entry.path)? {
        Contents::File(file) => file_bytes(remote, repo, &file),
        Contents::Dir(_) => Err(GitupError::InvalidTarget {
            path: entry.path.clone(),
        }),
    }
}

/// Inline content when the API sent it, the git blob otherwise.
fn file_bytes(remote: &dyn RemoteContent, repo: &Repository, file: &Entry) -> Result<Vec<u8>> {
    if file.needs_blob() {
        tracing::debug!(path = %file.path, size = file.size, "reading large file as blob");
        return remote.get_blob(repo, &file.sha);
    }
    file.decoded_content()
}

/// Where a downloaded file lands: inside `dst` when it is a directory or
/// ends with a separator, otherwise at `dst` itself.
pub fn local_target(dst: &str, name: &str) -> PathBuf {
    let path = Path::new(dst);
    if dst.ends_with('/') || dst.ends_with(MAIN_SEPARATOR) || path.is_dir() {
        path.join(name)
    } else {
        path.to_path_buf()
    }
}

fn write_local(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GitupError::io(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| GitupError::io(path, e))
}
