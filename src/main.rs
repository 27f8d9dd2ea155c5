// Entrypoint for the CLI application.
// - Keeps `main` small: build the production collaborators and hand them
//   to the command handler chosen on the command line.
// - Every failure is printed with its hints and exits with status 1.

use clap::{CommandFactory, Parser};
use gitup::api::GitHubConnector;
use gitup::cli::{Cli, Commands};
use gitup::commands::{self, Context};
use gitup::config::Config;
use gitup::credentials::FileCredentialStore;
use gitup::ui::{self, Console, Spinner};
use gitup::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let mut console = Console::stdout();

    let Some(command) = cli.command else {
        console.error("No command specified");
        console.plain("Available commands: login, send, copy, rm, ls");
        console.plain("Use 'gitup --help' for more information");
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    let config = Config::from_env();
    tracing::debug!(api_url = %config.api_url, token_path = %config.token_path.display(), "config loaded");

    let credentials = FileCredentialStore::from_config(&config);
    let connector = GitHubConnector::new(config.api_url.as_str());
    let mut spinner = Spinner::new(console.color());

    let result = {
        let mut ctx = Context::new(&credentials, &connector, &mut spinner, &mut console);
        run(&mut ctx, command)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console.report(&e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(ctx: &mut Context<'_>, command: Commands) -> Result<()> {
    match command {
        Commands::Login => commands::login::execute(ctx, ui::prompt_token),
        Commands::Send { file, repo } => commands::send::execute(ctx, &file, &repo),
        Commands::Copy { src, dst } => commands::copy::execute(ctx, &src, &dst),
        Commands::Rm { file } => commands::rm::execute(ctx, &file),
        Commands::Ls { repo } => commands::ls::execute(ctx, Some(&repo)),
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
