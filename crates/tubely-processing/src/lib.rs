//! Tubely media processing
//!
//! Content-type validation, request staging and the external tools (ffprobe, ffmpeg)
//! used to classify and remux uploaded videos.

pub mod staging;
pub mod tools;
pub mod validator;
#[cfg(feature = "video")]
pub mod video;

pub use staging::{StagedFile, StagingError, StagingWriter};
pub use tools::{FfmpegRemuxer, FfprobeProbe, MediaProbe, ProbeStream, Remuxer, ToolError};
pub use validator::{MediaValidator, ValidatedMedia, ValidationError};
#[cfg(feature = "video")]
pub use video::VideoTransformer;
