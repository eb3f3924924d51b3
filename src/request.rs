// Submission input: everything one run of the form collects, validated
// once and then treated as immutable. The orchestrator only ever sees a
// `PublishRequest`, never raw prompt answers.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems detected before any side effect takes place.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("please fill in the {0}")]
    MissingField(&'static str),

    /// The uploaded file does not carry a `.zip` extension.
    #[error("{} is not a ZIP file", path.display())]
    NotZip { path: PathBuf },

    /// The archive could not be read from disk.
    #[error("could not read {}: {source}", path.display())]
    ReadArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Personal access token for the hosting API.
///
/// The value is kept out of `Debug` output so it never ends up in logs
/// or panic messages by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("access token"));
        }
        Ok(AccessToken(trimmed.to_string()))
    }

    /// Raw token value, for the authorization header and the remote URL.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Repository name as sent to the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName(String);

impl RepoName {
    /// Trim surrounding whitespace and turn inner spaces into hyphens.
    /// Nothing else is checked; the hosting API has the final word.
    pub fn sanitize(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("repository name"));
        }
        Ok(RepoName(trimmed.replace(' ', "-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The uploaded ZIP archive, read fully into memory.
#[derive(Clone)]
pub struct ArchiveUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl ArchiveUpload {
    /// Read an archive from disk, insisting on a `.zip` extension.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if !is_zip {
            return Err(ValidationError::NotZip {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path).map_err(|source| ValidationError::ReadArchive {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archive.zip".to_string());
        Ok(ArchiveUpload { file_name, bytes })
    }

    /// Wrap archive bytes that are already in memory.
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Self {
        ArchiveUpload {
            file_name: file_name.to_string(),
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ArchiveUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Committer identity derived from the hosting username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    pub fn for_user(username: &str) -> Self {
        CommitIdentity {
            name: username.to_string(),
            email: format!("{username}@users.noreply.github.com"),
        }
    }
}

/// One complete, validated form submission.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    token: AccessToken,
    username: String,
    repo_name: RepoName,
    archive: ArchiveUpload,
}

impl PublishRequest {
    /// Validate the raw form answers. The first missing field is reported.
    pub fn new(
        token: &str,
        username: &str,
        repo_name: &str,
        archive: ArchiveUpload,
    ) -> Result<Self, ValidationError> {
        let token = AccessToken::new(token)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("username"));
        }
        let repo_name = RepoName::sanitize(repo_name)?;
        Ok(PublishRequest {
            token,
            username: username.to_string(),
            repo_name,
            archive,
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn repo_name(&self) -> &RepoName {
        &self.repo_name
    }

    pub fn archive(&self) -> &ArchiveUpload {
        &self.archive
    }

    pub fn identity(&self) -> CommitIdentity {
        CommitIdentity::for_user(&self.username)
    }
}
