//! HTTP access to the paper host — existence probes and streamed fetches.
//!
//! Two clients with shared browser-like headers but different timeouts: a
//! probe is a HEAD request issued thousands of times, so it gets a short
//! deadline; a fetch transfers a whole PDF and gets a generous one. The
//! host rejects requests without the usual browser headers, hence the fixed
//! User-Agent/Accept/Referer set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;

use crate::candidates::Candidate;
use crate::error::PapergrabError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";
const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
                            image/avif,image/webp,image/apng,*/*;q=0.8,\
                            application/signed-exchange;v=b3;q=0.9";

/// Checks whether a candidate's remote resource exists, without downloading
/// it. "Absent" is an expected outcome, not an error, so the result is a
/// plain bool.
pub trait Prober {
    async fn probe(&self, candidate: &Candidate) -> bool;
}

/// Retrieves a confirmed candidate and persists it at its local path.
pub trait Fetcher {
    async fn fetch(&self, candidate: &Candidate) -> Result<(), PapergrabError>;
}

/// The real HTTP client pair used against the paper host.
pub struct RemoteClient {
    probe_client: Client,
    fetch_client: Client,
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://pastpapers.co/"));
    headers
}

impl RemoteClient {
    pub fn new() -> Self {
        let probe_client = Client::builder()
            .default_headers(default_headers())
            .timeout(PROBE_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        let fetch_client = Client::builder()
            .default_headers(default_headers())
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            probe_client,
            fetch_client,
        }
    }

    async fn write_body(&self, response: Response, part: &Path) -> Result<(), PapergrabError> {
        let mut file = tokio::fs::File::create(part).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

impl Default for RemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for RemoteClient {
    /// HEAD request, redirects followed. Fails closed: a timeout, refused
    /// connection or non-success status all mean "absent". A transient
    /// failure therefore looks like a missing file; the idempotent re-run
    /// picks those up on the next invocation.
    async fn probe(&self, candidate: &Candidate) -> bool {
        match self.probe_client.head(&candidate.remote_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

impl Fetcher for RemoteClient {
    /// Streamed GET into `<name>.part`, renamed into place only once the
    /// whole body has been written. A failed transfer never leaves a file
    /// at the candidate's local path, so a later run's existence check
    /// cannot be fooled into skipping a retry.
    async fn fetch(&self, candidate: &Candidate) -> Result<(), PapergrabError> {
        let response = self
            .fetch_client
            .get(&candidate.remote_url)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PapergrabError::Download {
                status: status.as_u16(),
                url: candidate.remote_url.clone(),
            });
        }

        if let Some(parent) = candidate.local_path.parent() {
            // Sibling workers may create the same parent concurrently;
            // create_dir_all tolerates that.
            tokio::fs::create_dir_all(parent).await?;
        }

        let part = part_path(&candidate.local_path);
        match self.write_body(response, &part).await {
            Ok(()) => match tokio::fs::rename(&part, &candidate.local_path).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&part).await;
                    Err(e.into())
                }
            },
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                Err(e)
            }
        }
    }
}

fn part_path(local_path: &Path) -> PathBuf {
    let mut name = local_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    local_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::DocKind;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate(url: String, local: PathBuf) -> Candidate {
        Candidate {
            remote_url: url,
            local_path: local,
            file_name: "9231_s20_qp_11.pdf".into(),
            kind: DocKind::QuestionPaper,
        }
    }

    #[tokio::test]
    async fn probe_true_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/p.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let client = RemoteClient::new();
        let c = candidate(format!("{}/p.pdf", server.uri()), PathBuf::from("unused"));
        assert!(client.probe(&c).await);
    }

    #[tokio::test]
    async fn probe_false_on_404_and_500() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/broken.pdf"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = RemoteClient::new();
        let missing = candidate(format!("{}/missing.pdf", server.uri()), PathBuf::new());
        let broken = candidate(format!("{}/broken.pdf", server.uri()), PathBuf::new());
        assert!(!client.probe(&missing).await);
        assert!(!client.probe(&broken).await);
    }

    #[tokio::test]
    async fn probe_follows_redirect_to_200() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old.pdf"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/new.pdf", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/new.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let client = RemoteClient::new();
        let c = candidate(format!("{}/old.pdf", server.uri()), PathBuf::new());
        assert!(client.probe(&c).await);
    }

    #[tokio::test]
    async fn probe_false_when_host_unreachable() {
        let client = RemoteClient::new();
        // Discard port: nothing listens there.
        let c = candidate("http://127.0.0.1:9/p.pdf".into(), PathBuf::new());
        assert!(!client.probe(&c).await);
    }

    #[tokio::test]
    async fn fetch_streams_body_into_nested_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 content".to_vec()))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let local = dir
            .path()
            .join("Mathematics-Further-9231/2020/May-June/Paper 1/9231_s20_qp_11.pdf");
        let client = RemoteClient::new();
        let c = candidate(format!("{}/p.pdf", server.uri()), local.clone());

        client.fetch(&c).await.unwrap();

        let bytes = std::fs::read(&local).unwrap();
        assert_eq!(bytes, b"%PDF-1.4 content");
        assert!(!part_path(&local).exists());
    }

    #[tokio::test]
    async fn fetch_non_success_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("9231_s20_qp_11.pdf");
        let client = RemoteClient::new();
        let c = candidate(format!("{}/p.pdf", server.uri()), local.clone());

        let err = client.fetch(&c).await.unwrap_err();
        assert!(matches!(err, PapergrabError::Download { status: 404, .. }));
        assert!(!local.exists());
        assert!(!part_path(&local).exists());
    }

    #[tokio::test]
    async fn fetch_write_failure_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        // The would-be parent directory is a regular file, so directory
        // creation must fail and propagate as this candidate's failure.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();
        let local = blocker.join("9231_s20_qp_11.pdf");
        let client = RemoteClient::new();
        let c = candidate(format!("{}/p.pdf", server.uri()), local.clone());

        assert!(client.fetch(&c).await.is_err());
        assert!(!local.exists());
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("a/b/c.pdf")),
            Path::new("a/b/c.pdf.part")
        );
    }
}
