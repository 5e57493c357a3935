//! FFprobe integration for building a [`Source`].
//!
//! Uses the `ffprobe` crate to list the streams of a file and keeps the
//! parts the detection subsystem cares about: video dimensions with their
//! sample aspect ratio, and embedded subtitle codecs with language tags.

use crate::error::{CoreError, CoreResult};
use crate::media::source::{SampleAspectRatio, Source, SubtitleTrack, VideoTrack};
use ffprobe::{FfProbe, FfProbeError, Stream, ffprobe};
use std::path::Path;

/// Runs ffprobe on `input_path` and builds a `Source` from the result.
pub fn load_source(input_path: &Path) -> CoreResult<Source> {
    log::debug!(
        "Running ffprobe (via crate) for source tracks on: {}",
        input_path.display()
    );
    match ffprobe(input_path) {
        Ok(metadata) => source_from_metadata(input_path, &metadata),
        Err(err) => {
            log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
            Err(map_ffprobe_error(err, input_path))
        }
    }
}

/// Builds a `Source` from already-parsed ffprobe output.
pub fn source_from_metadata(input_path: &Path, metadata: &FfProbe) -> CoreResult<Source> {
    let video_tracks = metadata
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"))
        .map(|s| video_track_from_stream(input_path, s))
        .collect::<CoreResult<Vec<_>>>()?;

    if video_tracks.is_empty() {
        return Err(CoreError::VideoInfo(format!(
            "No video stream found in {}",
            input_path.display()
        )));
    }

    let subtitle_tracks: Vec<SubtitleTrack> = metadata
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("subtitle"))
        .map(|s| SubtitleTrack {
            codec: s.codec_name.clone().unwrap_or_else(|| "unknown".to_string()),
            language: s.tags.as_ref().and_then(|t| t.language.clone()),
        })
        .collect();

    log::debug!(
        "Found {} video and {} subtitle track(s) in {}",
        video_tracks.len(),
        subtitle_tracks.len(),
        input_path.display()
    );

    Ok(Source::new(input_path, video_tracks, subtitle_tracks))
}

fn video_track_from_stream(input_path: &Path, stream: &Stream) -> CoreResult<VideoTrack> {
    let width = stream.width.ok_or_else(|| {
        CoreError::VideoInfo(format!(
            "Video stream #{} missing width in {}",
            stream.index,
            input_path.display()
        ))
    })?;
    let height = stream.height.ok_or_else(|| {
        CoreError::VideoInfo(format!(
            "Video stream #{} missing height in {}",
            stream.index,
            input_path.display()
        ))
    })?;

    let width = u32::try_from(width).map_err(|_| invalid_dimensions(input_path, width, height))?;
    let height = u32::try_from(height).map_err(|_| invalid_dimensions(input_path, width as i64, height))?;

    let sar = stream
        .sample_aspect_ratio
        .as_deref()
        .and_then(SampleAspectRatio::parse)
        .unwrap_or_default();

    Ok(VideoTrack::new(width, height).with_sample_aspect_ratio(sar))
}

fn invalid_dimensions(input_path: &Path, width: i64, height: i64) -> CoreError {
    CoreError::VideoInfo(format!(
        "Invalid dimensions found in {}: width={}, height={}",
        input_path.display(),
        width,
        height
    ))
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => {
            CoreError::CommandStart(format!("ffprobe ({})", input_path.display()), io_err)
        }
        FfProbeError::Status(output) => CoreError::CommandFailed {
            cmd: format!("ffprobe ({})", input_path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        FfProbeError::Deserialize(e) => CoreError::FfprobeParse(format!(
            "Failed to parse ffprobe output for {}: {}",
            input_path.display(),
            e
        )),
        other => CoreError::FfprobeParse(format!(
            "ffprobe failed for {}: {:?}",
            input_path.display(),
            other
        )),
    }
}
