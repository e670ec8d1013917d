//! Request-scoped scratch files.
//!
//! Uploads are spooled to disk so ffprobe, ffmpeg and the store upload can all work
//! from a seekable file. A [`StagedFile`] removes its file when dropped, which also
//! covers a request future that is cancelled mid-stream.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::AppError;

const STAGING_PREFIX: &str = "tubely-upload";
const COPY_BUFFER_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to read upload body: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write staging file: {0}")]
    Write(#[source] io::Error),
}

impl From<StagingError> for AppError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            StagingError::Read(_) => AppError::BadRequest(err.to_string()),
            StagingError::Write(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Scratch file owned by one request; deleted on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    len: u64,
}

impl StagedFile {
    /// Adopt an existing file (e.g. tool output) so it is deleted on drop.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path),
            len: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes written when the file was staged.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Refresh the recorded length from disk.
    pub async fn refresh_len(&mut self) -> io::Result<u64> {
        self.len = tokio::fs::metadata(&self.path).await?.len();
        Ok(self.len)
    }

    /// Open a fresh read handle positioned at the start of the file.
    pub async fn open(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }
}

/// Spools request bodies into uniquely named files in the staging directory.
#[derive(Debug, Clone)]
pub struct StagingWriter {
    dir: PathBuf,
}

impl StagingWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Copy `reader` to a new staging file, failing once more than `max_bytes` arrive.
    pub async fn stage<R>(&self, mut reader: R, max_bytes: u64) -> Result<StagedFile, StagingError>
    where
        R: AsyncRead + Unpin,
    {
        let temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.dir)
            .map_err(StagingError::Write)?;
        let (std_file, path) = temp.into_parts();
        let mut file = tokio::fs::File::from_std(std_file);

        let mut buf = vec![0u8; COPY_BUFFER_BYTES];
        let mut written: u64 = 0;
        loop {
            let n = reader.read(&mut buf).await.map_err(StagingError::Read)?;
            if n == 0 {
                break;
            }
            written += n as u64;
            if written > max_bytes {
                return Err(StagingError::PayloadTooLarge { limit: max_bytes });
            }
            file.write_all(&buf[..n]).await.map_err(StagingError::Write)?;
        }

        file.flush().await.map_err(StagingError::Write)?;
        file.sync_all().await.map_err(StagingError::Write)?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = written,
            "Upload staged"
        );

        Ok(StagedFile { path, len: written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    struct BrokenBody;

    impl AsyncRead for BrokenBody {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "client disconnected",
            )))
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_stage_and_reopen_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let writer = StagingWriter::new(dir.path());

        let staged = writer.stage(&b"fake mp4 bytes"[..], 1024).await.unwrap();
        assert_eq!(staged.len(), 14);
        assert!(staged
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(STAGING_PREFIX));

        let mut first = String::new();
        staged.open().await.unwrap().read_to_string(&mut first).await.unwrap();
        let mut second = String::new();
        staged.open().await.unwrap().read_to_string(&mut second).await.unwrap();
        assert_eq!(first, "fake mp4 bytes");
        assert_eq!(first, second);

        drop(staged);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_limit_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let writer = StagingWriter::new(dir.path());

        let staged = writer.stage(&[7u8; 10][..], 10).await.unwrap();
        assert_eq!(staged.len(), 10);
        drop(staged);

        let err = writer.stage(&[7u8; 11][..], 10).await.unwrap_err();
        assert!(matches!(err, StagingError::PayloadTooLarge { limit: 10 }));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_broken_body_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = StagingWriter::new(dir.path());

        let body = (&b"first chunk"[..]).chain(BrokenBody);
        let err = writer.stage(body, 1024).await.unwrap_err();
        assert!(matches!(err, StagingError::Read(_)));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_adopted_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4.processing");
        std::fs::write(&path, b"remuxed").unwrap();

        let mut adopted = StagedFile::adopt(&path);
        assert_eq!(adopted.refresh_len().await.unwrap(), 7);
        drop(adopted);
        assert!(!path.exists());
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        use tubely_core::ErrorMetadata;
        let err: AppError = StagingError::PayloadTooLarge { limit: 1 }.into();
        assert_eq!(err.http_status_code(), 413);
    }
}
