// Token persistence.
//
// The token is stored as plain text in a single file. Handlers only see
// the `CredentialProvider` trait, so tests can hand them a fixed token
// without touching the filesystem.

use crate::config::Config;
use crate::error::{GitupError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait CredentialProvider {
    /// Return the stored token, or `AuthRequired` when there is none.
    fn load(&self) -> Result<String>;

    /// Persist `token`, replacing whatever was stored before.
    fn save(&self, token: &str) -> Result<()>;
}

/// Token kept in a file in the user's home directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCredentialStore { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.token_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for FileCredentialStore {
    fn load(&self) -> Result<String> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(GitupError::AuthRequired),
            Err(e) => return Err(GitupError::io(&self.path, e)),
        };
        let token = data.trim();
        if token.is_empty() {
            return Err(GitupError::AuthRequired);
        }
        Ok(token.to_string())
    }

    fn save(&self, token: &str) -> Result<()> {
        write_private(&self.path, token).map_err(|e| GitupError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "token saved");
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::fs::Permissions;
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; narrow a file left by someone else.
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// A fixed in-memory token.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub String);

impl CredentialProvider for StaticCredentials {
    fn load(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn save(&self, _token: &str) -> Result<()> {
        Ok(())
    }
}
