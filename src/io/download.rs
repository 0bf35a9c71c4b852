use crate::types::{DownloadError, FetchError, FetchResult};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Streaming transfer chunk size in bytes
const CHUNK_SIZE: usize = 8192;

/// Rewrite a bucket-style `s3://bucket/key` reference into the public
/// object-storage HTTPS endpoint. Directly fetchable references pass through
/// unchanged.
///
/// A bucket-style reference that cannot be split into a bucket and a key is
/// malformed and fails fast.
pub fn s3_to_https(href: &str) -> Result<String, DownloadError> {
    let remainder = match href.strip_prefix("s3://") {
        Some(r) => r,
        None => return Ok(href.to_string()),
    };

    match remainder.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
            Ok(format!("https://{}.s3.amazonaws.com/{}", bucket, key))
        }
        _ => Err(DownloadError::MalformedHref(href.to_string())),
    }
}

/// Streams single remote assets to local files
pub struct AssetFetcher {
    client: reqwest::blocking::Client,
}

impl AssetFetcher {
    /// Create a fetcher with the crate's download timeout and user agent
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(concat!("sarfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Processing(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch `url` into `dest`, streaming the body in fixed-size chunks.
    ///
    /// The body is written to a temporary file beside `dest` and renamed into
    /// place only on success, so a failed transfer leaves nothing at `dest`.
    /// `dest`'s directory must already exist.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        log::debug!("GET {}", url);
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DownloadError::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} returned HTTP {}", url, status.as_u16());
            return Err(DownloadError::Status(status.as_u16()));
        }

        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| DownloadError::Transport(format!("cannot create temporary file: {}", e)))?;

        let mut buf = [0u8; CHUNK_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = response
                .read(&mut buf)
                .map_err(|e| DownloadError::Transport(format!("read failed: {}", e)))?;
            if n == 0 {
                break;
            }
            tmp.write_all(&buf[..n])
                .map_err(|e| DownloadError::Transport(format!("write failed: {}", e)))?;
            written += n as u64;
        }

        tmp.persist(dest)
            .map_err(|e| DownloadError::Transport(format!("cannot move download into place: {}", e)))?;

        log::debug!("wrote {} bytes to {}", written, dest.display());
        Ok(())
    }
}
