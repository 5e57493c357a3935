// cropwise-core/tests/ffmpeg_prober_tests.rs

use cropwise_core::external::mocks::MockFfmpegSpawner;
use cropwise_core::{CoreError, CropArea, DetectionConfig, FfmpegProber, Prober};
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::Path;

fn log_line(line: &str) -> FfmpegEvent {
    FfmpegEvent::Log(LogLevel::Info, line.to_string())
}

#[test]
fn test_detect_crop_area_mocked() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    let events = vec![
        log_line("[Parsed_cropdetect_0 @ 0x55d] x1:0 x2:1919 y1:138 y2:941 w:1920 h:800 x:0 y:140 pts:0 t:0.000000 crop=1920:800:0:140"),
        log_line("[Parsed_cropdetect_0 @ 0x55d] crop=1920:800:0:140"),
        log_line("[Parsed_cropdetect_0 @ 0x55d] crop=1920:800:0:140"),
        log_line("[Parsed_cropdetect_0 @ 0x55d] crop=1920:1080:0:0"),
        log_line("frame=   60 fps=0.0 q=-0.0 Lsize=N/A time=00:00:02.50 bitrate=N/A speed=9.8x"),
    ];
    spawner.add_success_expectation("cropdetect=limit=24:round=2:reset=0", events);

    let prober = FfmpegProber::with_spawner(spawner.clone(), DetectionConfig::default());
    let area = prober.detect_crop_area(Path::new("/media/film.mkv"), 1, 90.0)?;
    assert_eq!(area, CropArea::new(1920, 800, 0, 140));

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    let has_pair = |flag: &str, value: &str| args.windows(2).any(|w| w[0] == flag && w[1] == value);
    assert!(has_pair("-ss", "90.000"), "seek missing: {:?}", args);
    assert!(has_pair("-i", "/media/film.mkv"), "input missing: {:?}", args);
    assert!(has_pair("-map", "0:v:1"), "track mapping missing: {:?}", args);
    assert!(has_pair("-frames:v", "60"), "frame limit missing: {:?}", args);
    assert!(!args.iter().any(|a| a == "-hwaccel"));
    Ok(())
}

#[test]
fn test_detect_crop_area_uses_configured_filter() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "cropdetect=limit=16:round=16:reset=0",
        vec![log_line("[Parsed_cropdetect_0 @ 0x55d] crop=1904:800:8:140")],
    );

    let config = DetectionConfig {
        crop_limit: 16,
        crop_round: 16,
        hardware_decoding: true,
        ..DetectionConfig::default()
    };
    let prober = FfmpegProber::with_spawner(spawner.clone(), config);
    let area = prober.detect_crop_area(Path::new("film.mkv"), 0, 0.0)?;
    assert_eq!(area, CropArea::new(1904, 800, 8, 140));

    let args = &spawner.get_received_calls()[0];
    assert!(args.windows(2).any(|w| w[0] == "-hwaccel" && w[1] == "auto"));
    Ok(())
}

#[test]
fn test_detect_crop_area_without_output_fails() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("cropdetect", vec![log_line("Stream mapping:")]);

    let prober = FfmpegProber::with_spawner(spawner, DetectionConfig::default());
    let err = prober
        .detect_crop_area(Path::new("film.mkv"), 0, 0.0)
        .unwrap_err();
    assert!(matches!(err, CoreError::ProbeFailed(_)), "unexpected error: {:?}", err);
}

#[test]
fn test_detect_crop_area_all_black_window_fails() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "cropdetect",
        vec![
            log_line("[Parsed_cropdetect_0 @ 0x55d] crop=0:0:0:0"),
            log_line("[Parsed_cropdetect_0 @ 0x55d] crop=0:0:0:0"),
        ],
    );

    let prober = FfmpegProber::with_spawner(spawner, DetectionConfig::default());
    let err = prober
        .detect_crop_area(Path::new("fade.mkv"), 0, 0.0)
        .unwrap_err();
    assert!(err.is_probe_failure(), "unexpected error: {:?}", err);
}

#[test]
fn test_detect_crop_area_ffmpeg_exit_error() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation(
        "cropdetect",
        vec![FfmpegEvent::Error("film.mkv: Invalid data found when processing input".to_string())],
        1,
    );

    let prober = FfmpegProber::with_spawner(spawner, DetectionConfig::default());
    let err = prober
        .detect_crop_area(Path::new("film.mkv"), 0, 0.0)
        .unwrap_err();
    match &err {
        CoreError::CommandFailed { stderr, .. } => {
            assert!(stderr.contains("Invalid data"), "stderr not kept: {}", stderr);
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
    // The controller reports this as a probe failure.
    assert!(err.into_probe_failure().is_probe_failure());
}

#[test]
fn test_detect_interlace_mocked() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "idet",
        vec![
            log_line("[Parsed_idet_0 @ 0x55d] Repeated Fields: Neither:   199 Top:     1 Bottom:     0"),
            log_line("[Parsed_idet_0 @ 0x55d] Single frame detection: TFF:    90 BFF:     0 Progressive:    60 Undetermined:    50"),
            log_line("[Parsed_idet_0 @ 0x55d] Multi frame detection: TFF:   140 BFF:     0 Progressive:    58 Undetermined:     2"),
        ],
    );

    let prober = FfmpegProber::with_spawner(spawner.clone(), DetectionConfig::default());
    assert!(prober.detect_interlace(Path::new("dvd.mkv"), 0, 10.0)?);

    let args = &spawner.get_received_calls()[0];
    assert!(args.windows(2).any(|w| w[0] == "-vf" && w[1] == "idet"));
    assert!(args.windows(2).any(|w| w[0] == "-frames:v" && w[1] == "200"));
    Ok(())
}

#[test]
fn test_detect_interlace_progressive_source() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "idet",
        vec![log_line(
            "[Parsed_idet_0 @ 0x55d] Multi frame detection: TFF:     3 BFF:     1 Progressive:   190 Undetermined:     6",
        )],
    );

    let prober = FfmpegProber::with_spawner(spawner, DetectionConfig::default());
    assert!(!prober.detect_interlace(Path::new("film.mkv"), 0, 0.0)?);
    Ok(())
}

#[test]
fn test_detect_interlace_spawn_error() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_spawn_error_expectation(
        "idet",
        CoreError::CommandStart(
            "ffmpeg (sidecar)".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "ffmpeg not found"),
        ),
    );

    let prober = FfmpegProber::with_spawner(spawner, DetectionConfig::default());
    let err = prober.detect_interlace(Path::new("film.mkv"), 0, 0.0).unwrap_err();
    assert!(matches!(err, CoreError::CommandStart(..)));
}
