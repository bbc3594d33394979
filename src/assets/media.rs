use std::path::Path;

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::scene::model::ElementKind;

/// Kind of media file being probed; decides which metadata is expected back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn of(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Image => Some(Self::Image),
            ElementKind::Video => Some(Self::Video),
            ElementKind::Audio => Some(Self::Audio),
            ElementKind::Rectangle | ElementKind::Text | ElementKind::Subtitles => None,
        }
    }
}

/// Natural properties of a media file. Fields the probe could not determine stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_sec: Option<f64>,
}

/// Source of media metadata for hydration.
pub trait MediaProber: Send + Sync {
    fn probe(&self, path: &Path, kind: MediaKind) -> TimelineResult<MediaInfo>;
}

/// Probes real files: image headers through `image`, video/audio through `ffprobe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProber;

impl MediaProber for SystemProber {
    fn probe(&self, path: &Path, kind: MediaKind) -> TimelineResult<MediaInfo> {
        match kind {
            MediaKind::Image => probe_image(path),
            MediaKind::Video | MediaKind::Audio => probe_av(path, kind),
        }
    }
}

/// Read image dimensions from the file header without decoding pixels.
pub fn probe_image(path: &Path) -> TimelineResult<MediaInfo> {
    let (width, height) = image::image_dimensions(path).map_err(|e| {
        TimelineError::media(format!("read image header '{}': {e}", path.display()))
    })?;
    Ok(MediaInfo {
        width: Some(width),
        height: Some(height),
        duration_sec: None,
    })
}

/// Probe video/audio metadata through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_av(path: &Path, kind: MediaKind) -> TimelineResult<MediaInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| TimelineError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(TimelineError::media(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| TimelineError::media(format!("ffprobe json parse failed: {e}")))?;

    let wanted = match kind {
        MediaKind::Audio => "audio",
        MediaKind::Image | MediaKind::Video => "video",
    };
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some(wanted))
        .ok_or_else(|| {
            TimelineError::media(format!(
                "no {wanted} stream found in '{}'",
                path.display()
            ))
        })?;

    // Container duration first; some formats only report it per stream.
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(stream.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    let (width, height) = match kind {
        MediaKind::Audio => (None, None),
        MediaKind::Image | MediaKind::Video => (stream.width, stream.height),
    };

    Ok(MediaInfo {
        width,
        height,
        duration_sec,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe video/audio metadata through `ffprobe`.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn probe_av(_path: &Path, _kind: MediaKind) -> TimelineResult<MediaInfo> {
    Err(TimelineError::media(
        "video/audio probing requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
