use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn cropwise_cmd() -> Command {
    Command::cargo_bin("cropwise").expect("Failed to find cropwise binary")
}

#[test]
fn test_help_lists_commands() {
    cropwise_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("tracks"))
        .stdout(contains("detect"));
}

#[test]
fn test_detect_help_lists_options() {
    cropwise_cmd()
        .args(["detect", "--help"])
        .assert()
        .success()
        .stdout(contains("--no-crop"))
        .stdout(contains("--burn-subs"))
        .stdout(contains("--json"));
}

#[test]
fn test_detect_requires_input() {
    cropwise_cmd()
        .arg("detect")
        .assert()
        .failure()
        .stderr(contains("--input"));
}

#[test]
fn test_detect_non_existent_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.mkv");

    cropwise_cmd()
        .arg("detect")
        .arg("--input")
        .arg(&missing)
        .env_remove("CROPWISE_CONFIG")
        .assert()
        .failure()
        .stderr(contains("Input file not found"));
    Ok(())
}

#[test]
fn test_tracks_non_existent_input() {
    cropwise_cmd()
        .args(["tracks", "-i", "surely/this/does/not/exist/input.mkv"])
        .assert()
        .failure()
        .stderr(contains("Input file not found"));
}

#[test]
fn test_detect_invalid_track_argument() {
    cropwise_cmd()
        .args(["detect", "-i", "input.mkv", "--track", "first"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}

#[test]
fn test_detect_rejects_zero_scale() {
    cropwise_cmd()
        .args(["detect", "-i", "input.mkv", "--scale-width", "0"])
        .assert()
        .failure()
        .stderr(contains("--scale-width"));

    cropwise_cmd()
        .args(["detect", "-i", "input.mkv", "--scale-height", "0"])
        .assert()
        .failure()
        .stderr(contains("--scale-height"));
}

#[test]
fn test_detect_rejects_invalid_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("cropwise.json");
    std::fs::write(&config, r#"{ "interlace_ratio": 1.5 }"#)?;
    let input = dir.path().join("input.mkv");
    std::fs::write(&input, "dummy content")?;

    cropwise_cmd()
        .arg("detect")
        .arg("-i")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .env_remove("CROPWISE_INTERLACE_RATIO")
        .assert()
        .failure()
        .stderr(contains("interlace_ratio"));
    Ok(())
}

#[test]
fn test_detect_rejects_malformed_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("cropwise.json");
    std::fs::write(&config, "not json")?;

    cropwise_cmd()
        .args(["detect", "-i", "input.mkv", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("Failed to load config"));
    Ok(())
}
