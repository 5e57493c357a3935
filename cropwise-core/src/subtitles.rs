//! Subtitle track resolution for burn-in.
//!
//! The selectable tracks are the source's embedded subtitle streams followed,
//! once the user loads one, by a single external subtitle file. The external
//! entry always sits at index `embedded.len()` (the external marker).
//!
//! Burn-in can only be enabled while there is something to burn; the
//! resolver re-checks that after every mutation that changes the track list.

use crate::error::{CoreError, CoreResult, TrackKind};
use crate::media::SubtitleTrack;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extensions offered when picking an external subtitle file.
pub const SUBTITLE_EXTENSIONS: &[&str] = &["ass", "ssa", "srt", "webvtt", "vtt", "sub"];

/// Checks a path's extension against [`SUBTITLE_EXTENSIONS`] (case-insensitive).
#[must_use]
pub fn is_subtitle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUBTITLE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// A selected subtitle track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleChoice {
    Embedded(usize),
    External,
}

/// What an encoder should burn into the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnSource<'a> {
    Embedded(usize),
    External(&'a Path),
}

/// Capability that turns a track's language tag into a display name.
pub trait LanguageResolver {
    fn resolve(&self, track: &SubtitleTrack) -> Option<String>;
}

/// Resolves ISO 639-2 tags of common languages to English names, passes
/// other tags through and treats `und` or empty tags as unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagLanguageResolver;

impl LanguageResolver for TagLanguageResolver {
    fn resolve(&self, track: &SubtitleTrack) -> Option<String> {
        let tag = track.language.as_deref()?.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("und") {
            return None;
        }
        let name = match tag.to_ascii_lowercase().as_str() {
            "eng" => "English",
            "jpn" => "Japanese",
            "ger" | "deu" => "German",
            "fre" | "fra" => "French",
            "spa" => "Spanish",
            "ita" => "Italian",
            "por" => "Portuguese",
            "rus" => "Russian",
            "chi" | "zho" => "Chinese",
            "kor" => "Korean",
            "dut" | "nld" => "Dutch",
            "pol" => "Polish",
            "swe" => "Swedish",
            "ara" => "Arabic",
            _ => return Some(tag.to_string()),
        };
        Some(name.to_string())
    }
}

/// Capability that asks the user for an external subtitle file.
///
/// Returning `None` means the user cancelled.
pub trait SubtitlePicker {
    fn pick_subtitle(&self, extensions: &[&str]) -> Option<PathBuf>;
}

/// A selectable entry of the subtitle track list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackOption {
    pub index: usize,
    pub label: String,
}

/// Subtitle selection and burn-in state of one editing session.
#[derive(Debug, Clone, Default)]
pub struct SubtitleResolver {
    embedded: Vec<SubtitleTrack>,
    external: Option<PathBuf>,
    selected: Option<SubtitleChoice>,
    burn: bool,
}

impl SubtitleResolver {
    /// Starts with the first embedded track selected (if any) and burn-in off.
    #[must_use]
    pub fn new(embedded: Vec<SubtitleTrack>) -> Self {
        let mut resolver = Self {
            embedded,
            ..Self::default()
        };
        resolver.enforce_invariants();
        resolver
    }

    #[must_use]
    pub fn external_path(&self) -> Option<&Path> {
        self.external.as_deref()
    }

    /// Index of the external entry: one past the last embedded track.
    #[must_use]
    pub fn external_marker(&self) -> usize {
        self.embedded.len()
    }

    /// Number of entries in the selectable track list.
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.embedded.len() + usize::from(self.external.is_some())
    }

    // ---- Track list mutations ----

    /// Records the external file. Replaces a previously loaded one.
    pub fn load_external_subtitle(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::debug!("Loaded external subtitle {}", path.display());
        self.external = Some(path);
        self.enforce_invariants();
    }

    /// Asks `picker` for a file; a cancelled pick changes nothing.
    ///
    /// Returns whether a file was loaded.
    pub fn load_external_subtitle_from(&mut self, picker: &dyn SubtitlePicker) -> bool {
        match picker.pick_subtitle(SUBTITLE_EXTENSIONS) {
            Some(path) => {
                self.load_external_subtitle(path);
                true
            }
            None => false,
        }
    }

    pub fn clear_external_subtitle(&mut self) {
        self.external = None;
        self.enforce_invariants();
    }

    /// Replaces the embedded track list, e.g. after the source was re-probed.
    pub fn set_embedded_tracks(&mut self, tracks: Vec<SubtitleTrack>) {
        self.embedded = tracks;
        self.enforce_invariants();
    }

    // ---- Selection ----

    /// Selects an entry of the track list by index.
    pub fn select_track(&mut self, index: usize) -> CoreResult<()> {
        let choice = if index < self.embedded.len() {
            SubtitleChoice::Embedded(index)
        } else if index == self.external_marker() && self.external.is_some() {
            SubtitleChoice::External
        } else {
            return Err(CoreError::InvalidIndex {
                kind: TrackKind::Subtitle,
                index,
                available: self.track_count(),
            });
        };
        self.selected = Some(choice);
        Ok(())
    }

    #[must_use]
    pub fn selected(&self) -> Option<SubtitleChoice> {
        self.selected
    }

    /// The selection as a track list index.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.map(|choice| match choice {
            SubtitleChoice::Embedded(index) => index,
            SubtitleChoice::External => self.external_marker(),
        })
    }

    // ---- Burn-in ----

    #[must_use]
    pub fn can_burn(&self) -> bool {
        !self.embedded.is_empty() || self.external.is_some()
    }

    #[must_use]
    pub fn burn_enabled(&self) -> bool {
        self.burn
    }

    /// Requests burn-in. Forced off when nothing can be burned; returns the
    /// stored value.
    pub fn set_burn(&mut self, enabled: bool) -> bool {
        self.burn = enabled && self.can_burn();
        if enabled && !self.burn {
            log::debug!("Burn-in requested without any subtitle track; keeping it off");
        }
        self.burn
    }

    /// The track to burn, when burn-in is on.
    #[must_use]
    pub fn burn_source(&self) -> Option<BurnSource<'_>> {
        if !self.burn {
            return None;
        }
        match self.selected? {
            SubtitleChoice::Embedded(index) => Some(BurnSource::Embedded(index)),
            SubtitleChoice::External => self.external.as_deref().map(BurnSource::External),
        }
    }

    // ---- Labels ----

    /// Label of one entry: `#<index> (<codec>[, <language>])` for embedded
    /// tracks, the file name for the external one.
    #[must_use]
    pub fn track_label(&self, index: usize, languages: &dyn LanguageResolver) -> Option<String> {
        if let Some(track) = self.embedded.get(index) {
            let label = match languages.resolve(track) {
                Some(language) => format!("#{index} ({}, {language})", track.codec),
                None => format!("#{index} ({})", track.codec),
            };
            return Some(label);
        }
        if index == self.external_marker() {
            return self.external.as_deref().map(external_label);
        }
        None
    }

    /// Every selectable entry with its label, in index order.
    #[must_use]
    pub fn track_options(&self, languages: &dyn LanguageResolver) -> Vec<TrackOption> {
        (0..self.track_count())
            .filter_map(|index| {
                self.track_label(index, languages)
                    .map(|label| TrackOption { index, label })
            })
            .collect()
    }

    fn enforce_invariants(&mut self) {
        if !self.can_burn() {
            self.burn = false;
        }

        let still_valid = match self.selected {
            Some(SubtitleChoice::Embedded(index)) => index < self.embedded.len(),
            Some(SubtitleChoice::External) => self.external.is_some(),
            None => false,
        };
        if !still_valid {
            self.selected = if !self.embedded.is_empty() {
                Some(SubtitleChoice::Embedded(0))
            } else if self.external.is_some() {
                Some(SubtitleChoice::External)
            } else {
                None
            };
        }
    }
}

fn external_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPicker(Option<PathBuf>);

    impl SubtitlePicker for FixedPicker {
        fn pick_subtitle(&self, extensions: &[&str]) -> Option<PathBuf> {
            assert!(extensions.contains(&"srt"));
            self.0.clone()
        }
    }

    struct NoLanguages;

    impl LanguageResolver for NoLanguages {
        fn resolve(&self, _track: &SubtitleTrack) -> Option<String> {
            None
        }
    }

    fn two_tracks() -> Vec<SubtitleTrack> {
        vec![
            SubtitleTrack::new("ass", Some("jpn")),
            SubtitleTrack::new("subrip", None),
        ]
    }

    #[test]
    fn test_no_tracks_cannot_burn() {
        let mut resolver = SubtitleResolver::new(vec![]);
        assert!(!resolver.can_burn());
        assert!(!resolver.burn_enabled());
        assert!(!resolver.set_burn(true));
        assert!(!resolver.burn_enabled());
        assert_eq!(resolver.selected(), None);
    }

    #[test]
    fn test_external_load_enables_burn_but_does_not_turn_it_on() {
        let mut resolver = SubtitleResolver::new(vec![]);
        resolver.load_external_subtitle("/subs/episode01.ass");
        assert!(resolver.can_burn());
        assert!(!resolver.burn_enabled());
        assert!(resolver.set_burn(true));
    }

    #[test]
    fn test_select_external_marker_requires_loaded_file() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        let marker = resolver.external_marker();
        assert_eq!(marker, 2);

        let err = resolver.select_track(marker).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidIndex {
                kind: TrackKind::Subtitle,
                index: 2,
                available: 2
            }
        ));

        resolver.load_external_subtitle("/subs/episode01.srt");
        resolver.select_track(marker).unwrap();
        assert_eq!(resolver.selected(), Some(SubtitleChoice::External));
        assert_eq!(resolver.selected_index(), Some(marker));
    }

    #[test]
    fn test_select_track_out_of_range() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        resolver.select_track(1).unwrap();
        assert!(resolver.select_track(5).is_err());
        assert_eq!(resolver.selected(), Some(SubtitleChoice::Embedded(1)));
    }

    #[test]
    fn test_clearing_external_forces_burn_off() {
        let mut resolver = SubtitleResolver::new(vec![]);
        resolver.load_external_subtitle("/subs/a.vtt");
        resolver.select_track(0).unwrap();
        resolver.set_burn(true);
        assert!(resolver.burn_enabled());

        resolver.clear_external_subtitle();
        assert!(!resolver.can_burn());
        assert!(!resolver.burn_enabled());
        assert_eq!(resolver.selected(), None);
    }

    #[test]
    fn test_clearing_external_falls_back_to_first_embedded() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        resolver.load_external_subtitle("/subs/a.vtt");
        resolver.select_track(2).unwrap();
        resolver.set_burn(true);

        resolver.clear_external_subtitle();
        assert!(resolver.burn_enabled());
        assert_eq!(resolver.selected(), Some(SubtitleChoice::Embedded(0)));
    }

    #[test]
    fn test_replacing_track_list_rechecks_invariants() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        resolver.select_track(1).unwrap();
        resolver.set_burn(true);

        resolver.set_embedded_tracks(vec![SubtitleTrack::new("ass", None)]);
        assert_eq!(resolver.selected(), Some(SubtitleChoice::Embedded(0)));
        assert!(resolver.burn_enabled());

        resolver.set_embedded_tracks(vec![]);
        assert!(!resolver.burn_enabled());
        assert_eq!(resolver.selected(), None);
    }

    #[test]
    fn test_external_marker_moves_with_track_list() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        resolver.load_external_subtitle("/subs/a.srt");
        resolver.select_track(2).unwrap();

        resolver.set_embedded_tracks(vec![]);
        assert_eq!(resolver.selected(), Some(SubtitleChoice::External));
        assert_eq!(resolver.selected_index(), Some(0));
    }

    #[test]
    fn test_picker_cancel_is_noop() {
        let mut resolver = SubtitleResolver::new(vec![]);
        assert!(!resolver.load_external_subtitle_from(&FixedPicker(None)));
        assert!(resolver.external_path().is_none());
        assert!(!resolver.can_burn());

        assert!(resolver.load_external_subtitle_from(&FixedPicker(Some(PathBuf::from("/subs/b.ssa")))));
        assert_eq!(resolver.external_path(), Some(Path::new("/subs/b.ssa")));
    }

    #[test]
    fn test_track_labels() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        resolver.load_external_subtitle("/home/user/subs/Episode 01.en.ass");

        let options = resolver.track_options(&TagLanguageResolver);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["#0 (ass, Japanese)", "#1 (subrip)", "Episode 01.en.ass"]);
        assert_eq!(options[2].index, 2);

        assert_eq!(resolver.track_label(0, &NoLanguages).as_deref(), Some("#0 (ass)"));
        assert_eq!(resolver.track_label(3, &NoLanguages), None);
    }

    #[test]
    fn test_tag_language_resolver() {
        let resolver = TagLanguageResolver;
        assert_eq!(resolver.resolve(&SubtitleTrack::new("ass", Some("ENG"))).as_deref(), Some("English"));
        assert_eq!(resolver.resolve(&SubtitleTrack::new("ass", Some("tlh"))).as_deref(), Some("tlh"));
        assert_eq!(resolver.resolve(&SubtitleTrack::new("ass", Some("und"))), None);
        assert_eq!(resolver.resolve(&SubtitleTrack::new("ass", Some(" "))), None);
        assert_eq!(resolver.resolve(&SubtitleTrack::new("ass", None)), None);
    }

    #[test]
    fn test_burn_source() {
        let mut resolver = SubtitleResolver::new(two_tracks());
        assert_eq!(resolver.burn_source(), None);
        resolver.set_burn(true);
        assert_eq!(resolver.burn_source(), Some(BurnSource::Embedded(0)));

        resolver.load_external_subtitle("/subs/a.srt");
        resolver.select_track(2).unwrap();
        assert_eq!(resolver.burn_source(), Some(BurnSource::External(Path::new("/subs/a.srt"))));
    }

    #[test]
    fn test_is_subtitle_file() {
        assert!(is_subtitle_file(Path::new("a.SRT")));
        assert!(is_subtitle_file(Path::new("/x/y.webvtt")));
        assert!(!is_subtitle_file(Path::new("movie.mkv")));
        assert!(!is_subtitle_file(Path::new("noext")));
    }
}
