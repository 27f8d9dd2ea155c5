// API client module: a small blocking HTTP client for the GitHub REST
// contents API. Handlers talk to it through the `RemoteContent` trait so
// the HTTP layer can be swapped for a mock or an in-memory fake in tests.

use crate::error::{GitupError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gitup/", env!("CARGO_PKG_VERSION"));
const REPOS_PER_PAGE: usize = 100;

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

/// Repository handle returned by `get_repository` and `list_user_repositories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// A file or directory record from the contents API. Directory listings
/// carry no `content`; single-file reads carry it base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl Entry {
    /// Build a file entry holding `bytes`, encoded the way the API sends them.
    pub fn file(path: &str, sha: &str, bytes: &[u8]) -> Entry {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Entry {
            name,
            path: path.to_string(),
            kind: EntryKind::File,
            sha: sha.to_string(),
            size: bytes.len() as u64,
            content: Some(STANDARD.encode(bytes)),
            encoding: Some("base64".into()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Files over 1 MB come back with `"encoding": "none"` and empty
    /// content; their bytes have to be read through `get_blob`.
    pub fn needs_blob(&self) -> bool {
        let empty = self.content.as_deref().map_or(true, str::is_empty);
        self.encoding.as_deref() == Some("none") || (empty && self.size > 0)
    }

    /// Decode the inline base64 content.
    pub fn decoded_content(&self) -> Result<Vec<u8>> {
        match (&self.content, self.encoding.as_deref()) {
            (Some(content), Some("base64") | None) => decode_base64(content, &self.path),
            _ => Err(GitupError::Remote {
                status: None,
                message: format!("no inline content for {}", self.path),
            }),
        }
    }
}

/// The API wraps base64 at 60 columns, so whitespace is stripped first.
fn decode_base64(content: &str, path: &str) -> Result<Vec<u8>> {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact).map_err(|e| GitupError::Remote {
        status: None,
        message: format!("invalid content for {path}: {e}"),
    })
}

/// What a contents read returned: one entry, or a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Dir(Vec<Entry>),
    File(Entry),
}

/// Operations the command handlers need from the hosting service.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteContent {
    /// Resolve the account that owns the token.
    fn authenticate(&self) -> Result<User>;

    fn get_repository(&self, full_name: &str) -> Result<Repository>;

    /// Read a file or list a directory. A missing path is `NotFound`.
    fn get_contents(&self, repo: &Repository, path: &str) -> Result<Contents>;

    fn create_file(&self, repo: &Repository, path: &str, bytes: &[u8], message: &str)
        -> Result<()>;

    /// Replace a file. `sha` must be the current blob sha of `path`.
    fn update_file(
        &self,
        repo: &Repository,
        path: &str,
        bytes: &[u8],
        sha: &str,
        message: &str,
    ) -> Result<()>;

    fn delete_file(&self, repo: &Repository, path: &str, sha: &str, message: &str) -> Result<()>;

    /// Raw bytes of a blob, for files too large to be returned inline.
    fn get_blob(&self, repo: &Repository, sha: &str) -> Result<Vec<u8>>;

    fn list_user_repositories(&self) -> Result<Vec<Repository>>;
}

impl<R: RemoteContent + ?Sized> RemoteContent for &R {
    fn authenticate(&self) -> Result<User> {
        (**self).authenticate()
    }

    fn get_repository(&self, full_name: &str) -> Result<Repository> {
        (**self).get_repository(full_name)
    }

    fn get_contents(&self, repo: &Repository, path: &str) -> Result<Contents> {
        (**self).get_contents(repo, path)
    }

    fn create_file(&self, repo: &Repository, path: &str, bytes: &[u8], message: &str) -> Result<()> {
        (**self).create_file(repo, path, bytes, message)
    }

    fn update_file(
        &self,
        repo: &Repository,
        path: &str,
        bytes: &[u8],
        sha: &str,
        message: &str,
    ) -> Result<()> {
        (**self).update_file(repo, path, bytes, sha, message)
    }

    fn delete_file(&self, repo: &Repository, path: &str, sha: &str, message: &str) -> Result<()> {
        (**self).delete_file(repo, path, sha, message)
    }

    fn get_blob(&self, repo: &Repository, sha: &str) -> Result<Vec<u8>> {
        (**self).get_blob(repo, sha)
    }

    fn list_user_repositories(&self) -> Result<Vec<Repository>> {
        (**self).list_user_repositories()
    }
}

/// Builds a remote client once the token is known.
pub trait Connector {
    fn connect(&self, token: &str) -> Result<Box<dyn RemoteContent + '_>>;
}

/// Connects to the GitHub API at a configured base URL.
#[derive(Debug, Clone)]
pub struct GitHubConnector {
    api_url: String,
}

impl GitHubConnector {
    pub fn new(api_url: impl Into<String>) -> Self {
        GitHubConnector {
            api_url: api_url.into(),
        }
    }
}

impl Connector for GitHubConnector {
    fn connect(&self, token: &str) -> Result<Box<dyn RemoteContent + '_>> {
        Ok(Box::new(GitHubClient::new(&self.api_url, token)?))
    }
}

/// Blocking client holding a reqwest client with the auth headers baked in
/// and the API base URL.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct PutFileRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteFileRequest<'a> {
    message: &'a str,
    sha: &'a str,
}

#[derive(Deserialize)]
struct Blob {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl GitHubClient {
    /// Create a client for `base_url` that authenticates with `token`.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GitupError::usage(
                format!("Invalid API URL {base_url}: {e}"),
                ["Check the GITUP_API_URL environment variable"],
            )
        })?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GitupError::AuthFailed("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| GitupError::Remote {
                status: None,
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(GitHubClient { client, base_url })
    }

    /// Append path segments to the base URL. Empty segments are dropped so
    /// that `a//b`, a leading `/` and an empty in-repo path all work.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| GitupError::Remote {
                status: None,
                message: format!("API URL cannot be a base: {}", self.base_url),
            })?;
            path.pop_if_empty()
                .extend(segments.into_iter().filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    fn contents_url(&self, repo: &Repository, path: &str) -> Result<Url> {
        let segments = ["repos"]
            .into_iter()
            .chain(repo.full_name.split('/'))
            .chain(["contents"])
            .chain(path.split('/'));
        self.endpoint(segments)
    }

    /// Send the request and turn any non-success status into an error.
    /// `target` names the resource in `NotFound` and `Conflict` errors.
    fn execute(&self, request: RequestBuilder, target: &str) -> Result<Response> {
        let response = request.send().map_err(|e| GitupError::Remote {
            status: None,
            message: e.to_string(),
        })?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "api response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(error_for_status(status, &body, target))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url, target: &str) -> Result<T> {
        tracing::debug!(method = "GET", %url, "api request");
        let response = self.execute(self.client.get(url), target)?;
        response.json().map_err(|e| GitupError::Remote {
            status: None,
            message: format!("unexpected response for {target}: {e}"),
        })
    }

    fn put_file(&self, repo: &Repository, path: &str, body: &PutFileRequest<'_>) -> Result<()> {
        let url = self.contents_url(repo, path)?;
        tracing::debug!(method = "PUT", %url, "api request");
        let request = self.client.request(Method::PUT, url).json(body);
        self.execute(request, path).map_err(|e| match e {
            GitupError::Remote {
                status: Some(_),
                message,
            } => GitupError::Write {
                path: path.to_string(),
                message,
            },
            other => other,
        })?;
        Ok(())
    }
}

/// Map an HTTP failure onto the error taxonomy.
fn error_for_status(status: StatusCode, body: &str, target: &str) -> GitupError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED => GitupError::AuthFailed(message),
        StatusCode::NOT_FOUND => GitupError::NotFound {
            what: target.to_string(),
        },
        StatusCode::CONFLICT => GitupError::Conflict {
            path: target.to_string(),
        },
        _ => GitupError::Remote {
            status: Some(status.as_u16()),
            message,
        },
    }
}

impl RemoteContent for GitHubClient {
    fn authenticate(&self) -> Result<User> {
        let url = self.endpoint(["user"])?;
        self.get_json(url, "user").map_err(|e| match e {
            GitupError::AuthFailed(msg) => GitupError::AuthFailed(msg),
            GitupError::Remote { message, .. } => GitupError::AuthFailed(message),
            other => GitupError::AuthFailed(other.to_string()),
        })
    }

    fn get_repository(&self, full_name: &str) -> Result<Repository> {
        let url = self.endpoint(["repos"].into_iter().chain(full_name.split('/')))?;
        self.get_json(url, full_name)
    }

    fn get_contents(&self, repo: &Repository, path: &str) -> Result<Contents> {
        let url = self.contents_url(repo, path)?;
        let target = format!("{}:{}", repo.full_name, path);
        self.get_json(url, &target)
    }

    fn create_file(&self, repo: &Repository, path: &str, bytes: &[u8], message: &str) -> Result<()> {
        let body = PutFileRequest {
            message,
            content: STANDARD.encode(bytes),
            sha: None,
        };
        self.put_file(repo, path, &body).map_err(|e| match e {
            GitupError::Conflict { path } => GitupError::Write {
                message: "a file with this name was created concurrently".into(),
                path,
            },
            other => other,
        })
    }

    fn update_file(
        &self,
        repo: &Repository,
        path: &str,
        bytes: &[u8],
        sha: &str,
        message: &str,
    ) -> Result<()> {
        let body = PutFileRequest {
            message,
            content: STANDARD.encode(bytes),
            sha: Some(sha),
        };
        self.put_file(repo, path, &body)
    }

    fn delete_file(&self, repo: &Repository, path: &str, sha: &str, message: &str) -> Result<()> {
        let url = self.contents_url(repo, path)?;
        tracing::debug!(method = "DELETE", %url, "api request");
        let request = self
            .client
            .request(Method::DELETE, url)
            .json(&DeleteFileRequest { message, sha });
        self.execute(request, path)?;
        Ok(())
    }

    fn get_blob(&self, repo: &Repository, sha: &str) -> Result<Vec<u8>> {
        let segments = ["repos"]
            .into_iter()
            .chain(repo.full_name.split('/'))
            .chain(["git", "blobs", sha]);
        let url = self.endpoint(segments)?;
        let target = format!("{} blob {sha}", repo.full_name);
        let blob: Blob = self.get_json(url, &target)?;
        match blob.encoding.as_deref() {
            Some("base64") | None => decode_base64(&blob.content, &target),
            Some("utf-8") => Ok(blob.content.into_bytes()),
            Some(other) => Err(GitupError::Remote {
                status: None,
                message: format!("unsupported blob encoding {other} for {target}"),
            }),
        }
    }

    fn list_user_repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        for page in 1.. {
            let mut url = self.endpoint(["user", "repos"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &REPOS_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            let batch: Vec<Repository> = self.get_json(url, "user repositories")?;
            let done = batch.len() < REPOS_PER_PAGE;
            repos.extend(batch);
            if done {
                break;
            }
        }
        Ok(repos)
    }
}
