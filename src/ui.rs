// UI layer: the single-page form, rendered as a short series of terminal
// prompts using `dialoguer`. Flags given on the command line pre-fill the
// matching fields so the whole run can also be scripted.

use crate::api::GitHubClient;
use crate::cli::Cli;
use crate::git::GitCli;
use crate::publish::{PublishOutcome, Publisher};
use crate::request::{ArchiveUpload, PublishRequest, ValidationError};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Raw answers to the form, before validation.
struct FormAnswers {
    token: String,
    username: String,
    repo_name: String,
    archive: PathBuf,
}

/// Run the form once: collect fields, confirm, publish, report.
///
/// Returns whether the folder ended up on GitHub. Validation problems are
/// reported here and count as "not published"; only terminal I/O errors
/// are propagated.
pub fn run(cli: &Cli, client: GitHubClient) -> Result<bool> {
    println!("{}", "Upload Folder to GitHub Repo".bold());

    let answers = collect_answers(cli)?;
    let request = match validate(answers) {
        Ok(request) => request,
        Err(e) => {
            println!("{}", e.to_string().yellow());
            return Ok(false);
        }
    };

    if !cli.yes {
        let go = Confirm::new()
            .with_prompt(format!(
                "Create GitHub repo '{}' and upload {}?",
                request.repo_name(),
                request.archive().file_name()
            ))
            .default(true)
            .interact()?;
        if !go {
            return Ok(false);
        }
    }

    // The working directory lives only as long as this submission.
    let work_dir = tempfile::tempdir()?;
    let publisher = Publisher::new(client, GitCli, &cli.branch);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = publisher.publish(&request, work_dir.path(), |stage| {
        log::debug!("stage: {stage:?}");
        spinner.set_message(stage.describe());
    });
    spinner.finish_and_clear();

    report(&outcome);
    Ok(outcome.is_published())
}

/// Ask for every field the command line did not provide.
fn collect_answers(cli: &Cli) -> Result<FormAnswers> {
    let token = match &cli.token {
        Some(token) => token.clone(),
        // `Password` hides input in the terminal.
        None => Password::new()
            .with_prompt("GitHub Personal Access Token")
            .allow_empty_password(true)
            .interact()?,
    };
    let username = match &cli.username {
        Some(username) => username.clone(),
        None => Input::new()
            .with_prompt("GitHub Username")
            .allow_empty(true)
            .interact_text()?,
    };
    let repo_name = match &cli.repo_name {
        Some(name) => name.clone(),
        None => Input::new()
            .with_prompt("New Repository Name")
            .allow_empty(true)
            .interact_text()?,
    };
    let archive = match &cli.archive {
        Some(path) => path.clone(),
        None => {
            let path: String = Input::new()
                .with_prompt("ZIP file of your folder")
                .allow_empty(true)
                .interact_text()?;
            PathBuf::from(path.trim())
        }
    };
    Ok(FormAnswers {
        token,
        username,
        repo_name,
        archive,
    })
}

fn validate(answers: FormAnswers) -> Result<PublishRequest, ValidationError> {
    if answers.archive.as_os_str().is_empty() {
        return Err(ValidationError::MissingField("ZIP file"));
    }
    let archive = ArchiveUpload::from_path(&answers.archive)?;
    PublishRequest::new(&answers.token, &answers.username, &answers.repo_name, archive)
}

/// Print the outcome. Partial failures name the repository left behind.
fn report(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::CreationFailed(e) => {
            println!("{}", format!("Error: {e}").red());
        }
        PublishOutcome::ExtractionFailed { repository, error } => {
            println!("{}", "GitHub repository created.".green());
            println!("{}", format!("Error extracting archive: {error}").red());
            println!(
                "{}",
                format!("{} was left empty on GitHub.", repository.full_name).yellow()
            );
        }
        PublishOutcome::PushFailed { repository, error } => {
            println!("{}", "GitHub repository created.".green());
            println!("{}", format!("Error pushing files: {error}").red());
            println!(
                "{}",
                format!("{} was left empty on GitHub.", repository.full_name).yellow()
            );
        }
        PublishOutcome::Published {
            repository,
            summary,
        } => {
            println!("{}", "GitHub repository created.".green());
            println!(
                "{}",
                format!("Folder successfully pushed to GitHub ({} files).", summary.files).green()
            );
            println!("View repository: {}", repository.html_url);
        }
    }
}
