//! Remote backend access: the `RemoteFs` trait and its HTTP implementation.

use serde_json::json;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::remote::protocol::DirEntry;

/// Operations the sync layer needs from the remote file server.
///
/// All paths are absolute, forward-slash-separated, beginning with `/`.
/// The root directory is addressed as `/`. Behind a trait so the sync
/// layer can be exercised against an in-memory backend in tests.
#[allow(async_fn_in_trait)]
pub trait RemoteFs {
    /// List the immediate children of `path`, in server order.
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Fetch the raw text contents of the file at `path`.
    async fn read_file(&self, path: &str) -> Result<String>;

    /// Move the entry at `source` to become a child of `destination`.
    async fn move_entry(&self, source: &str, destination: &str) -> Result<()>;
}

/// `RemoteFs` over the server's HTTP API:
///
/// - `GET  {base}/api/path/`      — root listing
/// - `GET  {base}/api/path{path}` — listing of `path`
/// - `GET  {base}/api/file{path}` — raw file contents
/// - `PATCH {base}/api/entry{path}` with `{"destination": ..}` — move
pub struct HttpRemoteFs {
    client: reqwest::Client,
    base: String,
}

impl HttpRemoteFs {
    /// Create a client for the server at `base` (e.g. `http://localhost:4001`).
    pub fn new(base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn listing_url(&self, path: &str) -> String {
        if path.is_empty() || path == "/" {
            format!("{}/api/path/", self.base)
        } else {
            format!("{}/api/path{}", self.base, path)
        }
    }

    fn file_url(&self, path: &str) -> String {
        format!("{}/api/file{}", self.base, path)
    }

    fn entry_url(&self, path: &str) -> String {
        format!("{}/api/entry{}", self.base, path)
    }

    fn check_status(res: &reqwest::Response, path: &str) -> Result<()> {
        if res.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Status {
                status: res.status().as_u16(),
                path: path.to_string(),
            })
        }
    }
}

impl RemoteFs for HttpRemoteFs {
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let url = self.listing_url(path);
        debug!(%url, "fetching directory listing");
        let res = self.client.get(&url).send().await?;
        Self::check_status(&res, path)?;
        Ok(res.json().await?)
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        let url = self.file_url(path);
        debug!(%url, "fetching file contents");
        let res = self.client.get(&url).send().await?;
        Self::check_status(&res, path)?;
        Ok(res.text().await?)
    }

    async fn move_entry(&self, source: &str, destination: &str) -> Result<()> {
        let url = self.entry_url(source);
        debug!(%url, destination, "moving entry");
        let res = self
            .client
            .patch(&url)
            .json(&json!({ "destination": destination }))
            .send()
            .await?;
        Self::check_status(&res, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_listing_url_keeps_trailing_slash() {
        let fs = HttpRemoteFs::new("http://localhost:4001");
        assert_eq!(fs.listing_url("/"), "http://localhost:4001/api/path/");
        assert_eq!(fs.listing_url(""), "http://localhost:4001/api/path/");
    }

    #[test]
    fn nested_listing_url_appends_path() {
        let fs = HttpRemoteFs::new("http://localhost:4001");
        assert_eq!(
            fs.listing_url("/docs/api"),
            "http://localhost:4001/api/path/docs/api"
        );
    }

    #[test]
    fn base_trailing_slash_is_trimmed() {
        let fs = HttpRemoteFs::new("http://localhost:4001/");
        assert_eq!(fs.listing_url("/a"), "http://localhost:4001/api/path/a");
    }

    #[test]
    fn file_and_entry_urls() {
        let fs = HttpRemoteFs::new("http://example.com");
        assert_eq!(fs.file_url("/a/b.txt"), "http://example.com/api/file/a/b.txt");
        assert_eq!(fs.entry_url("/a/b.txt"), "http://example.com/api/entry/a/b.txt");
    }
}
