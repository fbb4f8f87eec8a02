// API client module: a small async HTTP client for the grading backend.
// Both operations send a single file as multipart/form-data and hand back
// whatever JSON the backend answers with. The HTTP status is logged but
// never used to decide success; only transport and decode failures are
// errors.

use reqwest::multipart;
use reqwest::Client;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Path of the endpoint that stores a new professor style example.
pub const UPLOAD_PROFESSOR_EXAMPLE_PATH: &str = "upload-professor-example";
/// Path of the endpoint that grades a student submission.
pub const GRADE_PATH: &str = "grade";

const FILE_FIELD: &str = "file";
const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to read {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid content type {mime:?}")]
    InvalidMime {
        mime: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Response from {url} is not valid JSON")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// A file to send to the backend. The content is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        UploadFile {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk. The MIME type is guessed from the extension
    /// for the document formats the backend knows how to parse; anything
    /// else is sent without an explicit type.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string();

        Ok(UploadFile {
            file_name,
            bytes,
            mime: guess_mime(path).map(str::to_string),
        })
    }

    fn into_form(self) -> Result<multipart::Form> {
        let mut part = multipart::Part::bytes(self.bytes).file_name(self.file_name);
        if let Some(mime) = self.mime {
            part = part
                .mime_str(&mime)
                .map_err(|source| ClientError::InvalidMime { mime, source })?;
        }
        Ok(multipart::Form::new().part(FILE_FIELD, part))
    }
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "md" => "text/markdown",
        _ => return None,
    };
    Some(mime)
}

/// Client for the grading backend. Holds a reqwest client and the base URL
/// every endpoint path is appended to. Cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Clone, Debug)]
pub struct GraderClient {
    client: Client,
    base_url: String,
}

impl GraderClient {
    /// Create a client with a default reqwest client. No timeout is set.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client around an existing reqwest client, e.g. one built with
    /// a timeout.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        GraderClient { client, base_url }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Upload a professor style example. Resolves with the backend JSON
    /// whatever the status code.
    pub async fn upload_professor_example(&self, file: UploadFile) -> Result<Value> {
        self.post_file(UPLOAD_PROFESSOR_EXAMPLE_PATH, file).await
    }

    /// Submit a homework file for grading. Resolves with the backend JSON
    /// whatever the status code.
    pub async fn grade_homework(&self, file: UploadFile) -> Result<Value> {
        self.post_file(GRADE_PATH, file).await
    }

    async fn post_file(&self, path: &str, file: UploadFile) -> Result<Value> {
        let url = self.endpoint(path);
        debug!(%url, file_name = %file.file_name, size = file.bytes.len(), "Uploading file");

        let form = file.into_form()?;
        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        info!(%url, %status, "Backend responded");

        let body = res.bytes().await.map_err(|source| ClientError::Transport {
            url: url.clone(),
            source,
        })?;
        let json: Value =
            serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })?;
        debug!("Backend JSON: {json}");

        Ok(json)
    }
}
