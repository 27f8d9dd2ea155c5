//! `gitup send <local_file> <owner/repo[:path]>`

use super::{invalid_repo_format, Context};
use crate::error::{GitupError, Result};
use crate::repo_ref::RepoRef;
use std::path::Path;

const USAGE: [&str; 2] = [
    "Usage: gitup send <local_file> <user/repo[:path]>",
    "Example: gitup send myfile.txt user/myrepo:folder/file.txt",
];

/// Upload a single local file, updating it when it already exists remotely.
pub fn execute(ctx: &mut Context<'_>, file: &str, target: &str) -> Result<()> {
    if file.is_empty() {
        return Err(GitupError::usage("File not specified", USAGE));
    }
    if target.is_empty() {
        return Err(GitupError::usage("Repository not specified", USAGE));
    }

    let repo_ref = RepoRef::parse(target).ok_or_else(|| {
        invalid_repo_format(
            "Invalid repository format",
            &[
                "Expected format: user/repo[:path]",
                "Valid examples:",
                "  - user/myrepo",
                "  - user/myrepo:file.txt",
                "  - user/myrepo:folder/file.txt",
            ],
        )
    })?;

    let local = Path::new(file);
    if !local.is_file() {
        return Err(GitupError::usage(
            format!("File not found: {file}"),
            [
                "Please verify:",
                "  - File path is correct",
                "  - File exists",
                "  - You have read permissions",
            ],
        ));
    }

    let remote = ctx.remote()?;
    let repo = ctx.open_repository(remote.as_ref(), &repo_ref.full_name)?;
    let dest = repo_ref.target_for(local);
    ctx.upload_file(remote.as_ref(), &repo, local, &dest)
}
