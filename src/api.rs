// API client module: a small blocking HTTP client for the hosting
// service's REST API. Only one call is needed, "create a repository for
// the authenticated user", so the client stays synchronous and tiny.

use crate::request::{AccessToken, RepoName};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default API root, overridable with `--api-url` / `GITHUB_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Errors from the repository-creation call.
#[derive(Debug, Error)]
pub enum CreateRepoError {
    /// The API answered with something other than 201 Created.
    #[error("GitHub repo creation failed ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never completed, or the 201 body could not be parsed.
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The token cannot be carried in an HTTP header.
    #[error("access token contains characters not allowed in an HTTP header")]
    InvalidToken,
}

/// Something that can create a remote repository.
#[cfg_attr(test, mockall::automock)]
pub trait RepoHost {
    /// Create a public repository named `name` owned by the token's user.
    fn create_repository(
        &self,
        token: &AccessToken,
        name: &RepoName,
    ) -> Result<CreatedRepository, CreateRepoError>;
}

/// Body of the create request. Visibility is always public.
#[derive(Serialize, Debug)]
pub struct CreateRepoBody<'a> {
    pub name: &'a str,
    pub private: bool,
}

/// The parts of the 201 response the rest of the tool needs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepository {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub clone_url: String,
}

/// Error payload shape; only the human-readable message is surfaced.
#[derive(Deserialize, Debug)]
struct ApiMessage {
    message: String,
}

/// Blocking client bound to one API root.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Build a client for `api_url`. The hosting API refuses requests
    /// without a `User-Agent`, so one naming this crate is always sent.
    pub fn new(api_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GitHubClient {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(token: &AccessToken) -> Result<HeaderValue, CreateRepoError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| CreateRepoError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl RepoHost for GitHubClient {
    fn create_repository(
        &self,
        token: &AccessToken,
        name: &RepoName,
    ) -> Result<CreatedRepository, CreateRepoError> {
        let url = format!("{}/user/repos", self.base_url);
        let body = CreateRepoBody {
            name: name.as_str(),
            private: false,
        };
        log::debug!("POST {url} for repository {name}");
        let res = self
            .client
            .post(&url)
            .header(AUTHORIZATION, Self::auth_header(token)?)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .json(&body)
            .send()?;

        let status = res.status();
        if status != StatusCode::CREATED {
            let text = res.text().unwrap_or_default();
            log::warn!("repository creation answered {status}");
            return Err(CreateRepoError::Rejected {
                status: status.as_u16(),
                message: api_message(&text),
            });
        }
        let created: CreatedRepository = res.json()?;
        log::info!("created repository {}", created.full_name);
        Ok(created)
    }
}

/// Pull `message` out of an error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    match serde_json::from_str::<ApiMessage>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => body.trim().to_string(),
    }
}
