// ============================================================================
// cropwise-cli/src/commands/detect.rs
// ============================================================================
//
// DETECT COMMAND: Probe a Source and Resolve Its Encode Parameters
//
// Flow:
// 1. Load and validate the detection config (file, then CROPWISE_* env vars)
// 2. Probe the source with ffprobe and open an editing session
// 3. Run interlace, then crop detection on the chosen video track
// 4. Apply the manual options (scale, fix-sar, subtitles)
// 5. Print the resulting parameter snapshot as text or JSON
//
// A failed detection is reported as a warning and leaves its parameter at
// the default; everything else that fails aborts the command.
//
// AI-ASSISTANT-INFO: detect command, drives an EditingSession end to end

use crate::cli::DetectArgs;
use crate::commands::load_input;
use crate::terminal::{format_dimension, print_section, print_status, print_warning};
use anyhow::{Context, Result};
use cropwise_core::{
    CoreResult, DetectionConfig, EditingSession, FfmpegProber, ParameterSnapshot,
    ScaleField, SubtitlePicker, TagLanguageResolver, is_subtitle_file,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Picker backed by the `--subtitle` argument instead of a dialog.
struct ArgumentPicker<'a> {
    path: Option<&'a Path>,
}

impl SubtitlePicker for ArgumentPicker<'_> {
    fn pick_subtitle(&self, extensions: &[&str]) -> Option<PathBuf> {
        let path = self.path?;
        if !is_subtitle_file(path) {
            print_warning(&format!(
                "{} does not look like a subtitle file (expected one of: {})",
                path.display(),
                extensions.join(", ")
            ));
        }
        Some(path.to_path_buf())
    }
}

pub fn run_detect(args: DetectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = load_input(&args.input_path)?;

    let prober = Arc::new(FfmpegProber::new(config));
    let mut session = EditingSession::new(source, prober);

    session
        .params_mut()
        .select_video_track(args.track)
        .context("Cannot select video track")?;

    if args.no_interlace {
        log::debug!("Interlace detection skipped");
    } else {
        let result = session.request_interlace_detection(args.track, args.start);
        report_detection("Interlace detection", result.map(|_| ()))?;
    }

    if args.no_crop {
        log::debug!("Crop detection skipped");
    } else {
        let result = session.request_crop_detection(args.track, args.start);
        report_detection("Crop detection", result.map(|_| ()))?;
    }

    apply_manual_options(&mut session, &args)?;

    let snapshot = session.snapshot(&TagLanguageResolver);
    if args.json {
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize parameters")?;
        println!("{}", json);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DetectionConfig> {
    let config = match path {
        Some(path) => DetectionConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => DetectionConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate().context("Invalid detection config")?;
    log::debug!("Detection config: {:?}", config);
    Ok(config)
}

/// Turns a recovered probe failure into a warning; other errors abort.
fn report_detection(label: &str, result: CoreResult<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_probe_failure() => {
            print_warning(&format!("{} failed, keeping defaults: {}", label, err));
            Ok(())
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!("{} could not run", label))),
    }
}

fn apply_manual_options(session: &mut EditingSession, args: &DetectArgs) -> Result<()> {
    let params = session.params_mut();
    params.set_scale(ScaleField::Width, args.scale_width);
    params.set_scale(ScaleField::Height, args.scale_height);
    params.set_fix_sar(args.fix_sar);
    if args.fix_sar && !params.effective_fix_sar() {
        print_warning("--fix-sar has no effect: the track has square pixels or no scale is set");
    }

    let subtitles = session.subtitles_mut();
    let picker = ArgumentPicker {
        path: args.subtitle.as_deref(),
    };
    subtitles.load_external_subtitle_from(&picker);

    if let Some(index) = args.subtitle_track {
        subtitles
            .select_track(index)
            .context("Cannot select subtitle track")?;
    }
    if args.burn_subs && !subtitles.set_burn(true) {
        print_warning("--burn-subs ignored: the source has no subtitle tracks");
    }
    Ok(())
}

fn print_snapshot(snapshot: &ParameterSnapshot) {
    print_section("Source");
    print_status("File", &snapshot.source.display().to_string(), false);
    let track_label = snapshot
        .video_track_options
        .get(snapshot.video_track)
        .map_or_else(|| snapshot.video_track.to_string(), |option| option.label.clone());
    print_status("Video track", &track_label, false);

    print_section("Filters");
    print_status("Deinterlace", yes_no(snapshot.deinterlace), snapshot.deinterlace);
    let crop = &snapshot.crop;
    let crop_text = if crop.is_unset() {
        "none".to_string()
    } else {
        format!(
            "{}:{}:{}:{}",
            format_dimension(crop.width),
            format_dimension(crop.height),
            format_dimension(crop.left),
            format_dimension(crop.top)
        )
    };
    print_status("Crop", &crop_text, !crop.is_unset());
    print_status(
        "Scale",
        &format!(
            "{}x{}",
            format_dimension(snapshot.scale.width),
            format_dimension(snapshot.scale.height)
        ),
        false,
    );
    if snapshot.anamorphic.visible {
        print_status("Fix SAR", yes_no(snapshot.effective_fix_sar), snapshot.effective_fix_sar);
    }

    print_section("Subtitles");
    if snapshot.subtitles.options.is_empty() {
        print_status("Tracks", "none", false);
        return;
    }
    for option in &snapshot.subtitles.options {
        let marker = if snapshot.subtitles.selected == Some(option.index) { "*" } else { " " };
        println!("  {} {}", marker, option.label);
    }
    print_status("Burn in", yes_no(snapshot.subtitles.burn), snapshot.subtitles.burn);
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropwise_core::CoreError;

    #[test]
    fn test_probe_failures_become_warnings() {
        assert!(report_detection("Crop detection", Err(CoreError::ProbeFailed("x".into()))).is_ok());
        assert!(report_detection("Crop detection", Err(CoreError::Busy)).is_err());
        assert!(report_detection("Crop detection", Ok(())).is_ok());
    }

    #[test]
    fn test_argument_picker() {
        let picker = ArgumentPicker {
            path: Some(Path::new("movie.en.srt")),
        };
        assert_eq!(
            picker.pick_subtitle(cropwise_core::SUBTITLE_EXTENSIONS),
            Some(PathBuf::from("movie.en.srt"))
        );
        let cancelled = ArgumentPicker { path: None };
        assert_eq!(cancelled.pick_subtitle(cropwise_core::SUBTITLE_EXTENSIONS), None);
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"crop_round": 0}"#).unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("crop_round"));
    }
}
