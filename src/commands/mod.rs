//! Command handlers, one module per CLI verb.
//!
//! Every handler receives a [`Context`] holding its collaborators: where the
//! token comes from, how to reach the remote, how to show progress and where
//! to print. Handlers validate their arguments before loading the token, and
//! load the token before any network call.

pub mod copy;
pub mod login;
pub mod ls;
pub mod rm;
pub mod send;

use crate::api::{Connector, Contents, RemoteContent, Repository};
use crate::credentials::CredentialProvider;
use crate::error::{GitupError, Result};
use crate::ui::{Console, Progress};
use std::path::Path;

pub struct Context<'a> {
    pub credentials: &'a dyn CredentialProvider,
    pub connector: &'a dyn Connector,
    pub progress: &'a mut dyn Progress,
    pub console: &'a mut Console,
}

impl<'a> Context<'a> {
    pub fn new(
        credentials: &'a dyn CredentialProvider,
        connector: &'a dyn Connector,
        progress: &'a mut dyn Progress,
        console: &'a mut Console,
    ) -> Self {
        Context {
            credentials,
            connector,
            progress,
            console,
        }
    }

    /// Load the stored token and build a client with it.
    fn remote(&self) -> Result<Box<dyn RemoteContent + 'a>> {
        let token = self.credentials.load()?;
        self.connector.connect(&token)
    }

    /// Run `op` between `start(label)` and `stop`, whatever its outcome.
    fn with_progress<T>(&mut self, label: &str, op: impl FnOnce() -> Result<T>) -> Result<T> {
        self.progress.start(label);
        let result = op();
        self.progress.stop(None);
        result
    }

    fn open_repository(&mut self, remote: &dyn RemoteContent, full_name: &str) -> Result<Repository> {
        self.with_progress(&format!("Connecting to {full_name}..."), || {
            remote.get_repository(full_name)
        })
        .map_err(|e| match e {
            GitupError::NotFound { .. } => GitupError::NotFound {
                what: format!("repository {full_name}"),
            },
            other => other,
        })
    }

    /// Upload one local file to `dest` and report whether it was created or
    /// updated.
    fn upload_file(
        &mut self,
        remote: &dyn RemoteContent,
        repo: &Repository,
        local: &Path,
        dest: &str,
    ) -> Result<()> {
        let bytes = read_local(local)?;
        let outcome = self.with_progress(&format!("Uploading {dest}..."), || {
            upsert_file(remote, repo, dest, &bytes)
        })?;
        let verb = match outcome {
            Upsert::Created => "Created",
            Upsert::Updated => "Updated",
        };
        self.console
            .success(&format!("{verb} {dest} in {}", repo.full_name));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// Update `path` if it exists, create it if the remote reports it missing.
pub fn upsert_file(
    remote: &dyn RemoteContent,
    repo: &Repository,
    path: &str,
    bytes: &[u8],
) -> Result<Upsert> {
    match remote.get_contents(repo, path) {
        Ok(Contents::File(entry)) if !entry.is_dir() => {
            tracing::debug!(path, sha = %entry.sha, "updating existing file");
            remote.update_file(repo, path, bytes, &entry.sha, &format!("Update {path}"))?;
            Ok(Upsert::Updated)
        }
        Ok(_) => Err(GitupError::InvalidTarget {
            path: path.to_string(),
        }),
        Err(e) if e.is_not_found() => {
            tracing::debug!(path, "creating new file");
            remote.create_file(repo, path, bytes, &format!("Add {path}"))?;
            Ok(Upsert::Created)
        }
        Err(e) => Err(e),
    }
}

fn read_local(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| GitupError::io(path, e))
}

fn invalid_repo_format(message: &str, hints: &[&str]) -> GitupError {
    GitupError::usage(message, hints.iter().copied())
}
