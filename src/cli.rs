// Command-line flags. Every form field can be supplied up front (or via
// the environment); anything left out is asked for interactively.

use crate::api::DEFAULT_API_URL;
use crate::publish::DEFAULT_BRANCH;
use clap::Parser;
use std::path::PathBuf;

/// Create a GitHub repository from a zipped folder and push its contents.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Personal access token with permission to create repositories.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub username that will own the repository.
    #[arg(long, env = "GITHUB_USERNAME")]
    pub username: Option<String>,

    /// Name of the new repository; spaces become hyphens.
    #[arg(long)]
    pub repo_name: Option<String>,

    /// ZIP archive of the folder to upload.
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Root of the hosting REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Branch the initial commit is pushed to.
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Skip the final confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Log each step at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
