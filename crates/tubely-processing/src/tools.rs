//! External media tools.
//!
//! Probing and remuxing are capabilities behind [`MediaProbe`] and [`Remuxer`]; the
//! ffprobe and ffmpeg command-line shims below are the production implementations.

use std::io;
use std::path::Path;
use std::process::Output;
use std::time::Instant;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tubely_core::AppError;

/// One entry of `ffprobe -show_streams`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl ProbeStream {
    pub fn video(width: u32, height: u32) -> Self {
        Self {
            codec_type: "video".to_string(),
            width,
            height,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("ffprobe failed: {stderr}")]
    Probe { stderr: String },

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeOutput(String),

    #[error("ffmpeg faststart remux failed: {stderr}")]
    Remux { stderr: String },

    #[error("Remuxed output unreadable: {0}")]
    Output(#[source] io::Error),
}

impl ToolError {
    /// Name of the failing step, as reported to clients.
    pub fn tool(&self) -> &'static str {
        match self {
            ToolError::Spawn { tool, .. } => tool,
            ToolError::Probe { .. } | ToolError::ProbeOutput(_) => "ffprobe",
            ToolError::Remux { .. } | ToolError::Output(_) => "ffmpeg (faststart)",
        }
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        AppError::ToolFailure {
            tool: err.tool().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// List the streams of the media file at `path`.
    async fn probe_streams(&self, path: &Path) -> Result<Vec<ProbeStream>, ToolError>;
}

#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Rewrite `input` into `output` with the `moov` atom moved to the front.
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}

/// Validate a configured tool path: plain path characters only.
fn validate_tool_path(path: &str, name: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        return Err(anyhow!("{} path is empty", name));
    }
    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\' | ':'))
    {
        return Err(anyhow!("Invalid {} path: contains unsafe characters", name));
    }
    Ok(())
}

async fn run(mut command: Command, tool: &'static str) -> Result<Output, ToolError> {
    command
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ToolError::Spawn { tool, source })
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// [`MediaProbe`] backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> anyhow::Result<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path, "ffprobe").context("Invalid FFPROBE_PATH")?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
    ))]
    async fn probe_streams(&self, path: &Path) -> Result<Vec<ProbeStream>, ToolError> {
        let start = Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);
        let output = run(command, "ffprobe").await?;

        if !output.status.success() {
            return Err(ToolError::Probe {
                stderr: stderr_of(&output),
            });
        }

        let parsed: ProbeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| ToolError::ProbeOutput(e.to_string()))?;

        tracing::debug!(
            streams = parsed.streams.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe completed"
        );

        Ok(parsed.streams)
    }
}

/// [`Remuxer`] backed by the `ffmpeg` binary; streams are copied, never re-encoded.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> anyhow::Result<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path, "ffmpeg").context("Invalid FFMPEG_PATH")?;
        Ok(Self { ffmpeg_path })
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
    ))]
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let start = Instant::now();

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output);
        let result = run(command, "ffmpeg").await?;

        if !result.status.success() {
            return Err(ToolError::Remux {
                stderr: stderr_of(&result),
            });
        }

        tracing::debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffmpeg faststart remux completed"
        );

        Ok(())
    }
}
