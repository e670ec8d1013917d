//! Coarse aspect-ratio classification.

use tubely_core::Orientation;

use crate::tools::ProbeStream;

const LANDSCAPE: f64 = 16.0 / 9.0;
const PORTRAIT: f64 = 9.0 / 16.0;
/// Allowed deviation, relative to the target ratio.
const TOLERANCE: f64 = 0.02;

/// Classify by the first video stream; no video stream means `Other`.
pub fn classify(streams: &[ProbeStream]) -> Orientation {
    let (width, height) = streams
        .iter()
        .find(|s| s.codec_type == "video")
        .map(|s| (s.width, s.height))
        .unwrap_or((0, 0));
    orientation_for(width, height)
}

pub fn orientation_for(width: u32, height: u32) -> Orientation {
    if width == 0 || height == 0 {
        return Orientation::Other;
    }

    let ratio = f64::from(width) / f64::from(height);
    if within_tolerance(ratio, LANDSCAPE) {
        Orientation::Landscape
    } else if within_tolerance(ratio, PORTRAIT) {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}

fn within_tolerance(ratio: f64, target: f64) -> bool {
    (ratio - target).abs() <= TOLERANCE * target
}
