// Shared fixtures for handler tests: an in-memory remote holding one
// repository, a connector that counts connections, and a harness that
// builds a `Context` around them.
#![allow(dead_code)]

use gitup::api::{Connector, Contents, Entry, EntryKind, RemoteContent, Repository, User};
use gitup::commands::Context;
use gitup::credentials::{CredentialProvider, StaticCredentials};
use gitup::ui::{Console, Silent};
use gitup::{GitupError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

pub const REPO: &str = "octo/hello";
pub const LOGIN: &str = "octocat";
pub const GOOD_TOKEN: &str = "ghp_good";

pub struct FakeRemote {
    pub repos: Vec<Repository>,
    files: RefCell<BTreeMap<String, (String, Vec<u8>)>>,
    calls: RefCell<Vec<String>>,
    next_sha: Cell<u32>,
    authorized: Cell<bool>,
    fail_create: RefCell<Option<String>>,
    large: RefCell<BTreeSet<String>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        FakeRemote {
            repos: vec![repository(REPO, false)],
            files: RefCell::new(BTreeMap::new()),
            calls: RefCell::new(Vec::new()),
            next_sha: Cell::new(1),
            authorized: Cell::new(true),
            fail_create: RefCell::new(None),
            large: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn with_file(self, path: &str, bytes: &[u8]) -> Self {
        let sha = self.new_sha();
        self.files
            .borrow_mut()
            .insert(path.to_string(), (sha, bytes.to_vec()));
        self
    }

    /// A file the contents API reports without inline content, the way
    /// GitHub answers for anything over 1 MB.
    pub fn with_large_file(self, path: &str, bytes: &[u8]) -> Self {
        self.large.borrow_mut().insert(path.to_string());
        self.with_file(path, bytes)
    }

    /// Make `create_file` reject `path`.
    pub fn failing_create(self, path: &str) -> Self {
        *self.fail_create.borrow_mut() = Some(path.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).map(|(_, b)| b.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn new_sha(&self) -> String {
        let n = self.next_sha.get();
        self.next_sha.set(n + 1);
        format!("sha{n}")
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check_repo(&self, repo: &Repository) -> Result<()> {
        if repo.full_name == REPO {
            Ok(())
        } else {
            Err(GitupError::NotFound {
                what: repo.full_name.clone(),
            })
        }
    }

    fn listing(&self, dir: &str) -> Vec<Entry> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        let mut entries: BTreeMap<String, Entry> = BTreeMap::new();
        for (path, (sha, _)) in self.files.borrow().iter() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            let entry = match rest.split_once('/') {
                Some((sub, _)) => Entry {
                    name: sub.to_string(),
                    path: format!("{prefix}{sub}"),
                    kind: EntryKind::Dir,
                    sha: format!("tree-{sub}"),
                    size: 0,
                    content: None,
                    encoding: None,
                },
                None => Entry {
                    name: rest.to_string(),
                    path: path.clone(),
                    kind: EntryKind::File,
                    sha: sha.clone(),
                    size: 0,
                    content: None,
                    encoding: None,
                },
            };
            entries.entry(entry.name.clone()).or_insert(entry);
        }
        entries.into_values().collect()
    }
}

impl RemoteContent for FakeRemote {
    fn authenticate(&self) -> Result<User> {
        if !self.authorized.get() {
            return Err(GitupError::AuthFailed("Bad credentials".into()));
        }
        Ok(User {
            login: LOGIN.into(),
        })
    }

    fn get_repository(&self, full_name: &str) -> Result<Repository> {
        self.repos
            .iter()
            .find(|r| r.full_name == full_name)
            .cloned()
            .ok_or_else(|| GitupError::NotFound {
                what: full_name.to_string(),
            })
    }

    fn get_contents(&self, repo: &Repository, path: &str) -> Result<Contents> {
        self.check_repo(repo)?;
        let path = path.trim_matches('/');
        if let Some((sha, bytes)) = self.files.borrow().get(path) {
            let mut entry = Entry::file(path, sha, bytes);
            if self.large.borrow().contains(path) {
                entry.content = Some(String::new());
                entry.encoding = Some("none".into());
            }
            return Ok(Contents::File(entry));
        }
        let entries = self.listing(path);
        if entries.is_empty() && !path.is_empty() {
            return Err(GitupError::NotFound {
                what: path.to_string(),
            });
        }
        Ok(Contents::Dir(entries))
    }

    fn create_file(&self, repo: &Repository, path: &str, bytes: &[u8], _message: &str) -> Result<()> {
        self.check_repo(repo)?;
        if self.fail_create.borrow().as_deref() == Some(path) || self.files.borrow().contains_key(path)
        {
            return Err(GitupError::Write {
                path: path.to_string(),
                message: "rejected".into(),
            });
        }
        self.log(format!("create {path}"));
        let sha = self.new_sha();
        self.files
            .borrow_mut()
            .insert(path.to_string(), (sha, bytes.to_vec()));
        Ok(())
    }

    fn update_file(
        &self,
        repo: &Repository,
        path: &str,
        bytes: &[u8],
        sha: &str,
        _message: &str,
    ) -> Result<()> {
        self.check_repo(repo)?;
        let current = self.files.borrow().get(path).map(|(s, _)| s.clone());
        match current {
            None => Err(GitupError::NotFound {
                what: path.to_string(),
            }),
            Some(current) if current != sha => Err(GitupError::Conflict {
                path: path.to_string(),
            }),
            Some(_) => {
                self.log(format!("update {path}"));
                let sha = self.new_sha();
                self.files
                    .borrow_mut()
                    .insert(path.to_string(), (sha, bytes.to_vec()));
                Ok(())
            }
        }
    }

    fn delete_file(&self, repo: &Repository, path: &str, sha: &str, _message: &str) -> Result<()> {
        self.check_repo(repo)?;
        let current = self.files.borrow().get(path).map(|(s, _)| s.clone());
        match current {
            None => Err(GitupError::NotFound {
                what: path.to_string(),
            }),
            Some(current) if current != sha => Err(GitupError::Conflict {
                path: path.to_string(),
            }),
            Some(_) => {
                self.log(format!("delete {path}"));
                self.files.borrow_mut().remove(path);
                Ok(())
            }
        }
    }

    fn get_blob(&self, repo: &Repository, sha: &str) -> Result<Vec<u8>> {
        self.check_repo(repo)?;
        self.log(format!("blob {sha}"));
        self.files
            .borrow()
            .values()
            .find(|(s, _)| s == sha)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| GitupError::NotFound {
                what: format!("blob {sha}"),
            })
    }

    fn list_user_repositories(&self) -> Result<Vec<Repository>> {
        Ok(self.repos.clone())
    }
}

pub fn repository(full_name: &str, private: bool) -> Repository {
    Repository {
        full_name: full_name.into(),
        private,
    }
}

/// Hands out the shared fake and remembers every token it was given.
pub struct FakeConnector {
    pub remote: FakeRemote,
    tokens: RefCell<Vec<String>>,
}

impl FakeConnector {
    pub fn new(remote: FakeRemote) -> Self {
        FakeConnector {
            remote,
            tokens: RefCell::new(Vec::new()),
        }
    }

    pub fn connections(&self) -> usize {
        self.tokens.borrow().len()
    }
}

impl Connector for FakeConnector {
    fn connect(&self, token: &str) -> Result<Box<dyn RemoteContent + '_>> {
        self.tokens.borrow_mut().push(token.to_string());
        self.remote.authorized.set(token == GOOD_TOKEN);
        Ok(Box::new(&self.remote))
    }
}

pub struct Harness {
    pub connector: FakeConnector,
    pub credentials: Box<dyn CredentialProvider>,
    pub console: Console,
    progress: Silent,
}

impl Harness {
    pub fn new(remote: FakeRemote) -> Self {
        Self::with_credentials(remote, Box::new(StaticCredentials(GOOD_TOKEN.into())))
    }

    pub fn with_credentials(remote: FakeRemote, credentials: Box<dyn CredentialProvider>) -> Self {
        Harness {
            connector: FakeConnector::new(remote),
            credentials,
            console: Console::capture(),
            progress: Silent,
        }
    }

    pub fn remote(&self) -> &FakeRemote {
        &self.connector.remote
    }

    pub fn run<T>(&mut self, handler: impl FnOnce(&mut Context<'_>) -> Result<T>) -> Result<T> {
        let mut ctx = Context::new(
            self.credentials.as_ref(),
            &self.connector,
            &mut self.progress,
            &mut self.console,
        );
        handler(&mut ctx)
    }

    pub fn output(&self) -> String {
        self.console.captured()
    }
}
