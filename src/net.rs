//! File download

use crate::error::{Error, Result};
use crate::fs::readable_size_to_bytes;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Size limit given in bytes or as a readable string such as `"10 MB"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxSize {
    Bytes(u64),
    Readable(String),
}

impl MaxSize {
    fn bytes(&self) -> Result<u64> {
        match self {
            MaxSize::Bytes(n) => Ok(*n),
            MaxSize::Readable(s) => readable_size_to_bytes(s, 1024),
        }
    }
}

impl From<u64> for MaxSize {
    fn from(n: u64) -> Self {
        MaxSize::Bytes(n)
    }
}

impl From<&str> for MaxSize {
    fn from(s: &str) -> Self {
        MaxSize::Readable(s.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub max_size: Option<MaxSize>,
    /// Replace an existing file at the destination.
    pub overwrite: bool,
    /// Show a progress bar on stderr.
    pub progress: bool,
}

/// Download `url` to `path` and return the number of bytes written.
///
/// With `max_size`, the advertised `Content-Length` is checked before
/// anything is written, and the body is cut off if it grows past the limit.
pub fn download(url: &str, path: &Path, opts: &DownloadOptions) -> Result<u64> {
    if path.exists() && !opts.overwrite {
        return Err(Error::PathExists(path.to_path_buf()));
    }
    let max = opts.max_size.as_ref().map(MaxSize::bytes).transpose()?;

    let response = ureq::get(url)
        .timeout(TIMEOUT)
        .call()
        .map_err(|e| Error::Http(format!("GET {}: {}", url, e)))?;

    let length: Option<u64> = response
        .header("content-length")
        .and_then(|s| s.parse().ok());
    if let (Some(max), Some(size)) = (max, length) {
        if size > max {
            return Err(Error::DownloadSizeExceeded { size, max });
        }
    }

    let pb = if opts.progress {
        progress_bar(length)
    } else {
        ProgressBar::hidden()
    };

    let result = write_body(response.into_reader(), path, max, &pb);
    pb.finish_and_clear();
    match result {
        Ok(total) => {
            tracing::debug!(url, path = %path.display(), bytes = total, "downloaded");
            Ok(total)
        }
        Err(e) => {
            let _ = std::fs::remove_file(path);
            Err(e)
        }
    }
}

fn write_body(mut reader: impl Read, path: &Path, max: Option<u64>, pb: &ProgressBar) -> Result<u64> {
    let mut file = std::fs::File::create(path)?;
    let mut buffer = [0u8; 8192];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if let Some(max) = max {
            if total > max {
                return Err(Error::DownloadSizeExceeded { size: total, max });
            }
        }
        file.write_all(&buffer[..n])?;
        pb.set_position(total);
    }
    file.flush()?;
    Ok(total)
}

fn progress_bar(length: Option<u64>) -> ProgressBar {
    match length {
        Some(len) => {
            let pb = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})")
            {
                pb.set_style(style.progress_chars("━╸━"));
            }
            pb
        }
        None => ProgressBar::new_spinner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Hello, World!"))
            .mount(&mock_server)
            .await;

        let temp = tempdir().unwrap();
        let dest = temp.path().join("file.txt");
        let url = format!("{}/file.txt", mock_server.uri());
        let written = download(&url, &dest, &DownloadOptions::default()).unwrap();

        assert_eq!(written, 13);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "Hello, World!");
    }

    #[tokio::test]
    async fn test_download_refuses_existing_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new"))
            .mount(&mock_server)
            .await;

        let temp = tempdir().unwrap();
        let dest = temp.path().join("keep.txt");
        std::fs::write(&dest, "old").unwrap();
        let url = format!("{}/keep.txt", mock_server.uri());

        let err = download(&url, &dest, &DownloadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::PathExists(_)));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");

        let opts = DownloadOptions {
            overwrite: true,
            ..Default::default()
        };
        download(&url, &dest, &opts).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_download_size_limit() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 2048]))
            .mount(&mock_server)
            .await;

        let temp = tempdir().unwrap();
        let dest = temp.path().join("big.bin");
        let url = format!("{}/big.bin", mock_server.uri());

        let opts = DownloadOptions {
            max_size: Some("1 KB".into()),
            ..Default::default()
        };
        let err = download(&url, &dest, &opts).unwrap_err();
        assert!(matches!(err, Error::DownloadSizeExceeded { size: 2048, max: 1024 }));
        assert!(err.to_string().contains("(2.0 KB)"));
        assert!(!dest.exists());

        let opts = DownloadOptions {
            max_size: Some(4096u64.into()),
            ..Default::default()
        };
        assert_eq!(download(&url, &dest, &opts).unwrap(), 2048);
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let temp = tempdir().unwrap();
        let dest = temp.path().join("missing");
        let url = format!("{}/missing", mock_server.uri());
        let err = download(&url, &dest, &DownloadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!dest.exists());
    }
}
