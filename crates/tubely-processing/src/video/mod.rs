//! Video transformation: orientation probe and fast-start remux.

pub mod aspect;
pub mod faststart;

use std::sync::Arc;
use std::time::Instant;

use tubely_core::Orientation;

use crate::staging::StagedFile;
use crate::tools::{MediaProbe, Remuxer, ToolError};

pub use aspect::{classify, orientation_for};

/// Runs the external tools against staged uploads.
#[derive(Clone)]
pub struct VideoTransformer {
    probe: Arc<dyn MediaProbe>,
    remuxer: Arc<dyn Remuxer>,
}

impl VideoTransformer {
    pub fn new(probe: Arc<dyn MediaProbe>, remuxer: Arc<dyn Remuxer>) -> Self {
        Self { probe, remuxer }
    }

    pub async fn classify_aspect_ratio(&self, file: &StagedFile) -> Result<Orientation, ToolError> {
        let streams = self.probe.probe_streams(file.path()).await?;
        let orientation = classify(&streams);
        tracing::debug!(orientation = %orientation, "Video orientation classified");
        Ok(orientation)
    }

    /// Remux `input` into a new staged file; `input` is left untouched.
    pub async fn remux_for_progressive_playback(
        &self,
        input: &StagedFile,
    ) -> Result<StagedFile, ToolError> {
        let start = Instant::now();
        // Adopt before running so a failed or cancelled remux cleans up partial output.
        let mut output = StagedFile::adopt(faststart::processing_path(input.path()));

        self.remuxer
            .remux_faststart(input.path(), output.path())
            .await?;

        let size = output.refresh_len().await.map_err(ToolError::Output)?;

        tracing::info!(
            input_bytes = input.len(),
            output_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video remuxed for fast start"
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingWriter;
    use crate::tools::ProbeStream;
    use async_trait::async_trait;
    use std::path::Path;

    struct FixedProbe(Vec<ProbeStream>);

    #[async_trait]
    impl MediaProbe for FixedProbe {
        async fn probe_streams(&self, _path: &Path) -> Result<Vec<ProbeStream>, ToolError> {
            Ok(self.0.clone())
        }
    }

    struct CopyRemuxer;

    #[async_trait]
    impl Remuxer for CopyRemuxer {
        async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
            let mut data = tokio::fs::read(input).await.unwrap();
            data.extend_from_slice(b"+faststart");
            tokio::fs::write(output, data).await.unwrap();
            Ok(())
        }
    }

    struct HalfWrittenRemuxer;

    #[async_trait]
    impl Remuxer for HalfWrittenRemuxer {
        async fn remux_faststart(&self, _input: &Path, output: &Path) -> Result<(), ToolError> {
            tokio::fs::write(output, b"partial").await.unwrap();
            Err(ToolError::Remux {
                stderr: "moov atom not found".to_string(),
            })
        }
    }

    struct SilentRemuxer;

    #[async_trait]
    impl Remuxer for SilentRemuxer {
        async fn remux_faststart(&self, _input: &Path, _output: &Path) -> Result<(), ToolError> {
            Ok(())
        }
    }

    fn transformer(remuxer: Arc<dyn Remuxer>) -> VideoTransformer {
        VideoTransformer::new(
            Arc::new(FixedProbe(vec![ProbeStream::video(1280, 720)])),
            remuxer,
        )
    }

    #[tokio::test]
    async fn test_classify_uses_probe() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagingWriter::new(dir.path())
            .stage(&b"mp4"[..], 16)
            .await
            .unwrap();

        let orientation = transformer(Arc::new(CopyRemuxer))
            .classify_aspect_ratio(&staged)
            .await
            .unwrap();
        assert_eq!(orientation, Orientation::Landscape);
    }

    #[tokio::test]
    async fn test_remux_produces_scoped_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagingWriter::new(dir.path())
            .stage(&b"mp4"[..], 16)
            .await
            .unwrap();

        let remuxed = transformer(Arc::new(CopyRemuxer))
            .remux_for_progressive_playback(&staged)
            .await
            .unwrap();

        assert_eq!(remuxed.len(), 13);
        assert!(remuxed.path().to_string_lossy().ends_with(".processing"));
        assert_eq!(tokio::fs::read(staged.path()).await.unwrap(), b"mp4");

        drop(remuxed);
        drop(staged);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_remux_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagingWriter::new(dir.path())
            .stage(&b"mp4"[..], 16)
            .await
            .unwrap();

        let err = transformer(Arc::new(HalfWrittenRemuxer))
            .remux_for_progressive_playback(&staged)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Remux { .. }));

        // only the input remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(tokio::fs::read(staged.path()).await.unwrap(), b"mp4");
    }

    #[tokio::test]
    async fn test_missing_remux_output_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagingWriter::new(dir.path())
            .stage(&b"mp4"[..], 16)
            .await
            .unwrap();

        let err = transformer(Arc::new(SilentRemuxer))
            .remux_for_progressive_playback(&staged)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Output(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
