// Error taxonomy shared by every command.
//
// Handlers return `GitupError` and never print failures themselves; the
// binary prints the message plus the remediation hints and exits with
// `exit_code()`. `NotFound` is its own variant so that callers can branch
// on a missing remote path (create instead of update) without matching on
// HTTP details.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = GitupError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GitupError {
    /// Missing or malformed arguments, including bad repository references.
    #[error("{message}")]
    UserInput { message: String, hints: Vec<String> },

    #[error("Authentication required")]
    AuthRequired,

    /// The remote rejected the token, or could not be reached while
    /// verifying it.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The sha sent with an update or delete no longer matches the remote.
    #[error("Conflict on {path}: file changed on the remote")]
    Conflict { path: String },

    #[error("Invalid target: {path} is a directory")]
    InvalidTarget { path: String },

    #[error("Write failed for {path}: {message}")]
    Write { path: String, message: String },

    #[error("{}", remote_message(.status, .message))]
    Remote { status: Option<u16>, message: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn remote_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Remote error ({code}): {message}"),
        None => format!("Remote error: {message}"),
    }
}

impl GitupError {
    /// Build a `UserInput` error with remediation lines.
    pub fn usage<I, S>(message: impl Into<String>, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GitupError::UserInput {
            message: message.into(),
            hints: hints.into_iter().map(Into::into).collect(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GitupError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GitupError::NotFound { .. })
    }

    /// Lines printed under the error message to help the user recover.
    pub fn hints(&self) -> Vec<String> {
        let lines: &[&str] = match self {
            GitupError::UserInput { hints, .. } => return hints.clone(),
            GitupError::AuthRequired => &[
                "Run: gitup login",
                "Then provide your GitHub token when prompted",
            ],
            GitupError::AuthFailed(_) => &[
                "Please verify:",
                "  - Token is correct",
                "  - Token has required permissions",
                "  - Internet connection is working",
            ],
            GitupError::NotFound { .. } => &[
                "Please verify:",
                "  - Repository name is correct",
                "  - Path exists in repository",
                "  - You have access to the repository",
            ],
            GitupError::Conflict { .. } => &[
                "The file was modified by someone else",
                "Run the command again to retry with the latest version",
            ],
            GitupError::InvalidTarget { .. } => &["You must specify a file, not a directory"],
            GitupError::Write { .. } => &[
                "Possible causes:",
                "  - File too large (GitHub limit)",
                "  - No write permission",
                "  - Filename conflict",
            ],
            GitupError::Remote { .. } => &[
                "Please verify:",
                "  - You have the required permissions",
                "  - Repository is accessible",
            ],
            GitupError::Io { .. } => &[
                "Please verify:",
                "  - Path is correct",
                "  - You have read/write permissions",
            ],
        };
        lines.iter().map(|s| s.to_string()).collect()
    }

    /// Every failure exits with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
