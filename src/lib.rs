// Library root
// -----------
// This crate exposes the pieces of the `gitup` CLI as a library. The binary
// (`main.rs`) wires the production implementations together and maps
// errors to exit codes.
//
// Module responsibilities:
// - `api`: the GitHub contents API client and the `RemoteContent` trait
//   handlers depend on.
// - `cli`: the clap argument definitions.
// - `commands`: one handler per CLI verb (login, send, copy, rm, ls).
// - `config`: API URL and token path, from the environment.
// - `credentials`: token persistence behind `CredentialProvider`.
// - `error`: the error taxonomy and remediation hints.
// - `repo_ref`: parsing of `owner/repo[:path]` references.
// - `ui`: console output, progress spinner and the token prompt.
//
// Handlers only see traits for the token, the remote and the progress
// display, so they can be driven by fakes in tests.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod repo_ref;
pub mod ui;

pub use error::{GitupError, Result};
