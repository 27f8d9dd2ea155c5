//! `gitup login`

use super::Context;
use crate::error::{GitupError, Result};

const INSTRUCTIONS: [&str; 7] = [
    "To authenticate, you need a GitHub personal access token.",
    "How to get a token:",
    "  1. Go to https://github.com/settings/tokens",
    "  2. Click 'Generate new token (classic)'",
    "  3. Select required permissions (repo, user)",
    "  4. Copy the generated token",
    "",
];

/// Ask for a token, verify it with one authenticated call and store it.
///
/// `prompt` returns `None` when the user cancels; nothing is written then.
/// The token is only saved after the remote accepted it.
pub fn execute<F>(ctx: &mut Context<'_>, prompt: F) -> Result<()>
where
    F: FnOnce() -> Result<Option<String>>,
{
    let title = ctx.console.bold("GitHub Authentication");
    ctx.console.plain(&title);
    ctx.console.plain("");
    for line in INSTRUCTIONS {
        ctx.console.plain(line);
    }

    let Some(token) = prompt()? else {
        ctx.console.plain("Cancelled");
        return Ok(());
    };
    let token = token.trim();
    if token.is_empty() {
        return Err(GitupError::usage(
            "Token cannot be empty",
            ["Paste the token generated at https://github.com/settings/tokens"],
        ));
    }

    let remote = ctx.connector.connect(token)?;
    let user = ctx.with_progress("Verifying token...", || remote.authenticate())?;

    ctx.credentials.save(token)?;
    ctx.console
        .success(&format!("Authenticated as {}", user.login));
    Ok(())
}
