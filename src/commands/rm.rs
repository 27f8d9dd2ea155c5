//! `gitup rm <owner/repo:path>`

use super::{invalid_repo_format, Context};
use crate::api::Contents;
use crate::error::{GitupError, Result};
use crate::repo_ref::RepoRef;

const EXAMPLE: &str = "Example: gitup rm user/myrepo:file.txt";

/// Delete one remote file. Directories are refused before anything is
/// deleted.
pub fn execute(ctx: &mut Context<'_>, target: &str) -> Result<()> {
    if target.is_empty() {
        return Err(GitupError::usage(
            "File not specified",
            ["Usage: gitup rm <user/repo:path>", EXAMPLE],
        ));
    }

    let repo_ref = RepoRef::parse(target).ok_or_else(|| {
        invalid_repo_format(
            "Invalid repository format",
            &["Expected format: user/repo:path", EXAMPLE],
        )
    })?;
    if repo_ref.path.is_empty() {
        return Err(GitupError::usage(
            "File path not specified",
            ["You must specify which file to remove", EXAMPLE],
        ));
    }
    let path = repo_ref.path.as_str();

    let remote = ctx.remote()?;
    let repo = ctx.open_repository(remote.as_ref(), &repo_ref.full_name)?;

    let contents = ctx
        .with_progress(&format!("Reading {path}..."), || {
            remote.get_contents(&repo, path)
        })
        .map_err(|e| match e {
            GitupError::NotFound { .. } => GitupError::NotFound {
                what: format!("file {path}"),
            },
            other => other,
        })?;

    let entry = match contents {
        Contents::File(entry) if !entry.is_dir() => entry,
        _ => {
            return Err(GitupError::InvalidTarget {
                path: path.to_string(),
            })
        }
    };

    ctx.with_progress(&format!("Removing {path}..."), || {
        remote.delete_file(&repo, path, &entry.sha, &format!("Remove {path}"))
    })?;
    ctx.console
        .success(&format!("Removed {path} from {}", repo.full_name));
    Ok(())
}
