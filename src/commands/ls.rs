//! `gitup ls [owner/repo[:path]]`
//!
//! Without an argument, or with `:.`, lists the repositories of the
//! authenticated user.

use super::{invalid_repo_format, Context};
use crate::api::{Contents, Entry};
use crate::error::{GitupError, Result};
use crate::repo_ref::{RepoRef, LIST_REPOS_SENTINEL};
use crossterm::style::Color;

pub fn execute(ctx: &mut Context<'_>, target: Option<&str>) -> Result<()> {
    let target = target.unwrap_or(LIST_REPOS_SENTINEL);
    if target == LIST_REPOS_SENTINEL {
        return list_repositories(ctx);
    }

    let repo_ref = RepoRef::parse(target).ok_or_else(|| {
        invalid_repo_format(
            "Invalid repository format",
            &[
                "Valid formats:",
                "  gitup ls :.                    (list your repositories)",
                "  gitup ls user/repo             (list repository root)",
                "  gitup ls user/repo:folder      (list specific folder)",
            ],
        )
    })?;
    list_contents(ctx, &repo_ref)
}

fn list_repositories(ctx: &mut Context<'_>) -> Result<()> {
    let remote = ctx.remote()?;
    let (user, repos) = ctx.with_progress("Fetching repositories...", || {
        let user = remote.authenticate()?;
        let repos = remote.list_user_repositories()?;
        Ok((user, repos))
    })?;

    if repos.is_empty() {
        ctx.console.info("No repositories found");
        return Ok(());
    }

    let header = format!("Repositories for {}:", ctx.console.bold(&user.login));
    ctx.console.plain(&header);
    for repo in &repos {
        let visibility = if repo.private {
            ctx.console.paint("private", Color::Yellow)
        } else {
            ctx.console.paint("public", Color::Green)
        };
        ctx.console
            .plain(&format!("  {} ({visibility})", repo.full_name));
    }
    Ok(())
}

fn list_contents(ctx: &mut Context<'_>, repo_ref: &RepoRef) -> Result<()> {
    let remote = ctx.remote()?;
    let contents = ctx
        .with_progress(&format!("Fetching contents from {}...", repo_ref.full_name), || {
            let repo = remote.get_repository(&repo_ref.full_name)?;
            remote.get_contents(&repo, &repo_ref.path)
        })
        .map_err(|e| match e {
            GitupError::NotFound { .. } => GitupError::NotFound {
                what: format!("repository or path {repo_ref}"),
            },
            other => other,
        })?;

    let header = format!("Contents of {}:", ctx.console.bold(&repo_ref.to_string()));
    ctx.console.plain(&header);
    match contents {
        Contents::Dir(entries) => {
            for entry in &entries {
                render_entry(ctx, entry);
            }
        }
        Contents::File(entry) => render_entry(ctx, &entry),
    }
    Ok(())
}

fn render_entry(ctx: &mut Context<'_>, entry: &Entry) {
    let (icon, color) = if entry.is_dir() {
        ("📁", Color::Blue)
    } else {
        ("📄", Color::White)
    };
    let name = ctx.console.paint(&entry.name, color);
    ctx.console.plain(&format!("  {icon} {name}"));
}
