// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, build the API client
//   and hand everything to the form.
// - Exits non-zero when the folder did not make it to GitHub.

use clap::Parser;
use ziprepo_cli::{api::GitHubClient, cli::Cli, ui};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = GitHubClient::new(&cli.api_url)?;
    if !ui::run(&cli, client)? {
        std::process::exit(1);
    }
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug over warn.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_target(false)
        .init();
}
