// cropwise-cli/src/commands/tracks.rs
//
// Implementation of the `tracks` command.

use crate::cli::TracksArgs;
use crate::commands::load_input;
use crate::terminal::{print_section, print_status};
use anyhow::Result;
use cropwise_core::{SubtitleResolver, TagLanguageResolver};

pub fn run_tracks(args: TracksArgs) -> Result<()> {
    let source = load_input(&args.input_path)?;
    log::debug!("Listing tracks of {}", source.path.display());

    print_section("Video tracks");
    for (index, track) in source.video_tracks.iter().enumerate() {
        let sar = if track.is_anamorphic() {
            format!(
                "SAR {}:{}",
                track.sample_aspect_ratio.num, track.sample_aspect_ratio.den
            )
        } else {
            "square pixels".to_string()
        };
        print_status(&track.label(index), &sar, false);
    }

    print_section("Subtitle tracks");
    let subtitles = SubtitleResolver::new(source.subtitle_tracks.clone());
    let options = subtitles.track_options(&TagLanguageResolver);
    if options.is_empty() {
        println!("  none");
    }
    for option in options {
        println!("  {}", option.label);
    }

    Ok(())
}
