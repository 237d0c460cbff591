//! GitHub REST API client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::client::{branch_name, ClientOptions, RepositoryClient};
use crate::error::{ReleaseError, Result};

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("chart-releaser/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateFilePayload<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    committer: Option<Committer<'a>>,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Debug, Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePullPayload<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    #[serde(default)]
    html_url: String,
}

/// Repository client backed by the GitHub REST API
pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Client for api.github.com. An empty token gives an unauthenticated
    /// client, which can only read public repositories.
    pub fn new(token: &str) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    /// Client for a GitHub Enterprise or test endpoint
    pub fn with_api_url(api_url: impl Into<String>, token: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .build();
        let token = Some(token.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        GitHubClient {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let request = self
            .agent
            .request(method, url)
            .set("User-Agent", USER_AGENT)
            .set("Accept", ACCEPT);
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    fn repo_url(&self, opts: &ClientOptions, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, opts.repo_owner, opts.repo_name, suffix
        )
    }

    fn contents(&self, opts: &ClientOptions, path: &str, git_ref: &str) -> Result<ContentResponse> {
        let url = self.repo_url(opts, &format!("contents/{}", path.trim_start_matches('/')));
        let mut request = self.request("GET", &url);
        if !git_ref.is_empty() {
            request = request.query("ref", branch_name(git_ref));
        }

        debug!(path, git_ref, "github client: getting file contents");
        let response = request.call().map_err(|e| status_error(e, Some(path)))?;
        Ok(response.into_json::<ContentResponse>()?)
    }
}

impl RepositoryClient for GitHubClient {
    fn get_file(&self, opts: &ClientOptions, path: &str) -> Result<String> {
        let opts = opts.normalized();
        let file = self.contents(&opts, path, &opts.base)?;
        decode_content(&file)
    }

    fn update_file(
        &self,
        opts: &ClientOptions,
        path: &str,
        message: &str,
        contents: &[u8],
    ) -> Result<()> {
        let opts = opts.normalized();

        // The contents API needs the blob sha of the file being replaced
        let existing = self.contents(&opts, path, &opts.git_ref).inspect_err(|e| {
            if matches!(e, ReleaseError::FileNotFound(_)) {
                error!(file = path, git_ref = %opts.git_ref, "github client: unable to update file (not found)");
            }
        })?;

        let committer = (!opts.author_name.is_empty()).then(|| Committer {
            name: &opts.author_name,
            email: &opts.author_email,
        });
        let payload = UpdateFilePayload {
            message,
            content: STANDARD.encode(contents),
            sha: &existing.sha,
            branch: branch_name(&opts.git_ref),
            committer,
        };

        let url = self.repo_url(&opts, &format!("contents/{}", path.trim_start_matches('/')));
        debug!(path, git_ref = %opts.git_ref, "github client: updating file");
        self.request("PUT", &url)
            .send_json(&payload)
            .map_err(|e| status_error(e, Some(path)))?;
        Ok(())
    }

    fn create_ref(&self, opts: &ClientOptions) -> Result<()> {
        let opts = opts.normalized();

        debug!(
            repo = %format!("{}/{}", opts.repo_owner, opts.repo_name),
            git_ref = %opts.base,
            "github client: getting reference"
        );
        let url = self.repo_url(&opts, &format!("git/ref/heads/{}", branch_name(&opts.base)));
        let base: RefResponse = self
            .request("GET", &url)
            .call()
            .map_err(|e| {
                let err = status_error(e, None);
                error!(error = %err, base = %opts.base, git_ref = %opts.git_ref, "github client: unable to create ref - configured base ref does not exist");
                err
            })?
            .into_json()?;

        debug!(git_ref = %opts.git_ref, "github client: creating reference");
        let payload = CreateRefPayload {
            git_ref: &opts.git_ref,
            sha: &base.object.sha,
        };
        self.request("POST", &self.repo_url(&opts, "git/refs"))
            .send_json(&payload)
            .map_err(|e| {
                let err = status_error(e, None);
                error!(error = %err, git_ref = %opts.git_ref, base = %opts.base, "github client: failed to create new ref");
                err
            })?;
        Ok(())
    }

    fn create_pull_request(&self, opts: &ClientOptions, title: &str, body: &str) -> Result<()> {
        let opts = opts.normalized();
        if opts.git_ref == opts.base {
            return Err(ReleaseError::client(
                "cannot create pull request, ref and base are the same",
            ));
        }

        debug!(git_ref = %opts.git_ref, base = %opts.base, title, "github client: creating pull request");
        let payload = CreatePullPayload {
            title,
            body,
            head: branch_name(&opts.git_ref),
            base: branch_name(&opts.base),
        };
        let pull: PullResponse = self
            .request("POST", &self.repo_url(&opts, "pulls"))
            .send_json(&payload)
            .map_err(|e| status_error(e, None))?
            .into_json()?;

        info!(
            number = pull.number,
            url = %pull.html_url,
            "created pull request ({} <- {})",
            payload.base,
            payload.head
        );
        Ok(())
    }
}

fn decode_content(file: &ContentResponse) -> Result<String> {
    if !file.encoding.is_empty() && file.encoding != "base64" {
        return Err(ReleaseError::client(format!(
            "unsupported content encoding: {}",
            file.encoding
        )));
    }
    let compact: String = file.content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| ReleaseError::client(format!("invalid base64 file content: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ReleaseError::client(format!("file content is not UTF-8: {e}")))
}

/// Map an HTTP failure to a release error. A 404 on a file path means the
/// file does not exist.
fn status_error(err: ureq::Error, path: Option<&str>) -> ReleaseError {
    match (err, path) {
        (ureq::Error::Status(404, _), Some(path)) => ReleaseError::FileNotFound(path.to_string()),
        (ureq::Error::Status(code, response), _) => {
            let body = response.into_string().unwrap_or_default();
            ReleaseError::client(format!("HTTP {code}: {}", api_message(&body)))
        }
        (ureq::Error::Transport(err), _) => ReleaseError::client(err.to_string()),
    }
}

/// GitHub error bodies carry a `message` field; anything else is passed through
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response and hand back the raw request line
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}", addr), handle)
    }

    fn options() -> ClientOptions {
        ClientOptions::for_repository("owner", "charts")
    }

    #[test]
    fn test_get_file_decodes_content() {
        let encoded = STANDARD.encode("name: app\nversion: 0.1.0\n");
        let (half, rest) = encoded.split_at(8);
        let body = format!(
            r#"{{"sha":"abc","content":"{}\n{}","encoding":"base64"}}"#,
            half, rest
        );
        let (url, server) = serve_once("200 OK", &body);

        let client = GitHubClient::with_api_url(url, "");
        let contents = client.get_file(&options(), "charts/app/Chart.yaml").unwrap();
        assert_eq!(contents, "name: app\nversion: 0.1.0\n");

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /repos/owner/charts/contents/charts/app/Chart.yaml"));
    }

    #[test]
    fn test_get_file_reads_from_base_branch() {
        let body = format!(r#"{{"sha":"abc","content":"{}"}}"#, STANDARD.encode("x"));
        let (url, server) = serve_once("200 OK", &body);

        let client = GitHubClient::with_api_url(url, "token");
        let opts = ClientOptions {
            base: "develop".to_string(),
            ..options()
        };
        client.get_file(&opts, "Chart.yaml").unwrap();

        let request_line = server.join().unwrap();
        assert!(request_line.contains("?ref=develop"), "{}", request_line);
    }

    #[test]
    fn test_get_file_not_found() {
        let (url, server) = serve_once("404 Not Found", r#"{"message":"Not Found"}"#);

        let client = GitHubClient::with_api_url(url, "");
        let err = client.get_file(&options(), "Chart.yaml").unwrap_err();
        assert!(matches!(err, ReleaseError::FileNotFound(ref p) if p == "Chart.yaml"));
        server.join().unwrap();
    }

    #[test]
    fn test_status_error_includes_body() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"message":"Bad credentials"}"#);

        let client = GitHubClient::with_api_url(url, "bad");
        let err = client.create_ref(&ClientOptions {
            git_ref: "feature".to_string(),
            base: "master".to_string(),
            ..options()
        });
        let msg = err.unwrap_err().to_string();
        assert!(msg.contains("HTTP 401"), "{}", msg);
        assert!(msg.contains("Bad credentials"), "{}", msg);
        server.join().unwrap();
    }

    #[test]
    fn test_pull_request_refuses_same_ref_and_base() {
        let client = GitHubClient::new("token");
        let opts = ClientOptions {
            git_ref: "master".to_string(),
            base: "refs/heads/master".to_string(),
            ..options()
        };
        let err = client.create_pull_request(&opts, "title", "body").unwrap_err();
        assert!(err.to_string().contains("ref and base are the same"));
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        assert!(!GitHubClient::new("").is_authenticated());
        assert!(!GitHubClient::new("  ").is_authenticated());
        assert!(GitHubClient::new("abc123").is_authenticated());
    }

    #[test]
    fn test_api_message() {
        assert_eq!(api_message(r#"{"message":"Bad credentials"}"#), "Bad credentials");
        assert_eq!(api_message("bad gateway\n"), "bad gateway");
    }

    #[test]
    fn test_decode_rejects_unknown_encoding() {
        let file = ContentResponse {
            sha: "abc".to_string(),
            content: String::new(),
            encoding: "none".to_string(),
        };
        assert!(decode_content(&file).is_err());
    }
}
