// Command-line definitions.

use crate::repo_ref::LIST_REPOS_SENTINEL;
use clap::{Parser, Subcommand};

const EXAMPLES: &str = "\
Examples:
  gitup login                                    # Authenticate with GitHub
  gitup ls :.                                    # List your repositories
  gitup ls user/repo                             # List files in repository root
  gitup ls user/repo:folder                      # List files in folder
  gitup send file.txt user/repo                  # Upload file to root
  gitup send file.txt user/repo:folder/          # Upload file to folder
  gitup copy ./folder user/repo:remote_folder    # Upload entire folder
  gitup copy user/repo:file.txt ./local/         # Download file
  gitup rm user/repo:file.txt                    # Remove file

Repository format: user/repository[:path]";

#[derive(Parser, Debug)]
#[command(name = "gitup", version)]
#[command(about = "GitHub CLI tool for simple repository management")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Authenticate with GitHub
    Login,
    /// Upload file to repository
    Send {
        /// Local file path
        file: String,
        /// Repository in format user/repo[:path]
        repo: String,
    },
    /// Copy files to/from repository
    Copy {
        /// Source (local or user/repo:path)
        src: String,
        /// Destination (local or user/repo:path)
        dst: String,
    },
    /// Remove file from repository
    Rm {
        /// File in format user/repo:path
        file: String,
    },
    /// List files in repository
    Ls {
        /// Repository in format user/repo[:path], or :. for your repositories
        #[arg(default_value = LIST_REPOS_SENTINEL)]
        repo: String,
    },
}
