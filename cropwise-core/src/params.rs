//! Mutable encode parameters and their derived values.
//!
//! `ParameterStore` is the single source of truth for the geometry and
//! filter choices of an editing session. Every setter is synchronous and
//! total, and the store is consistent again by the time it returns.
//!
//! Two rules live here:
//! - a crop produced by detection that covers the whole frame is stored as
//!   "no crop" (see [`CropBox::normalized`]); manual edits are never
//!   normalized;
//! - the "fix sar" option only matters when the selected track has
//!   non-square pixels and a scale dimension is set (see [`AnamorphicState`]).

use crate::error::{CoreError, CoreResult, TrackKind};
use crate::external::CropArea;
use crate::media::{Source, VideoTrack};
use serde::Serialize;
use std::sync::Arc;

/// One of the four crop fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropField {
    Width,
    Height,
    Left,
    Top,
}

/// One of the two scale fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleField {
    Width,
    Height,
}

/// Crop rectangle where every field may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CropBox {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub left: Option<u32>,
    pub top: Option<u32>,
}

impl CropBox {
    pub const UNSET: CropBox = CropBox {
        width: None,
        height: None,
        left: None,
        top: None,
    };

    #[must_use]
    pub fn from_area(area: CropArea) -> Self {
        Self {
            width: Some(area.width),
            height: Some(area.height),
            left: Some(area.left),
            top: Some(area.top),
        }
    }

    #[must_use]
    pub fn get(&self, field: CropField) -> Option<u32> {
        match field {
            CropField::Width => self.width,
            CropField::Height => self.height,
            CropField::Left => self.left,
            CropField::Top => self.top,
        }
    }

    pub fn set(&mut self, field: CropField, value: Option<u32>) {
        match field {
            CropField::Width => self.width = value,
            CropField::Height => self.height = value,
            CropField::Left => self.left = value,
            CropField::Top => self.top = value,
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// True when width and height both equal the frame size.
    #[must_use]
    pub fn covers_frame(&self, frame_width: u32, frame_height: u32) -> bool {
        self.width == Some(frame_width) && self.height == Some(frame_height)
    }

    /// Maps a full-frame crop to the unset box; anything else is returned
    /// as is. Idempotent.
    #[must_use]
    pub fn normalized(self, frame_width: u32, frame_height: u32) -> Self {
        if self.covers_frame(frame_width, frame_height) {
            Self::UNSET
        } else {
            self
        }
    }
}

/// Output size where either dimension may be left for the encoder to derive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScaleBox {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ScaleBox {
    #[must_use]
    pub fn get(&self, field: ScaleField) -> Option<u32> {
        match field {
            ScaleField::Width => self.width,
            ScaleField::Height => self.height,
        }
    }

    /// Zero is not a valid output size and is stored as unset.
    pub fn set(&mut self, field: ScaleField, value: Option<u32>) {
        let value = value.filter(|&v| v > 0);
        match field {
            ScaleField::Width => self.width = value,
            ScaleField::Height => self.height = value,
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Whether the "fix sar" option applies to the current parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnamorphicState {
    pub visible: bool,
}

impl AnamorphicState {
    #[must_use]
    pub fn compute(track: &VideoTrack, scale: &ScaleBox) -> Self {
        Self {
            visible: track.is_anamorphic() && scale.is_set(),
        }
    }
}

/// The parameter set of one editing session.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    source: Arc<Source>,
    video_track: usize,
    crop: CropBox,
    scale: ScaleBox,
    deinterlace: bool,
    fix_sar: bool,
}

impl ParameterStore {
    /// Starts with track 0 selected and everything else unset or off.
    #[must_use]
    pub fn new(source: Arc<Source>) -> Self {
        Self {
            source,
            video_track: 0,
            crop: CropBox::UNSET,
            scale: ScaleBox::default(),
            deinterlace: false,
            fix_sar: false,
        }
    }

    // ---- Video track ----

    #[must_use]
    pub fn video_track(&self) -> usize {
        self.video_track
    }

    /// The selected track, or `None` for a source without video tracks.
    #[must_use]
    pub fn selected_track(&self) -> Option<&VideoTrack> {
        self.source.video_track(self.video_track)
    }

    pub fn select_video_track(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.source.video_tracks.len() {
            return Err(CoreError::InvalidIndex {
                kind: TrackKind::Video,
                index,
                available: self.source.video_tracks.len(),
            });
        }
        self.video_track = index;
        Ok(())
    }

    // ---- Crop ----

    #[must_use]
    pub fn crop(&self) -> CropBox {
        self.crop
    }

    /// Stores the value exactly as given, including full-frame values.
    pub fn set_crop(&mut self, field: CropField, value: Option<u32>) {
        self.crop.set(field, value);
    }

    pub fn clear_crop(&mut self) {
        self.crop = CropBox::UNSET;
    }

    /// Writes a detected crop, normalized against the frame of the track it
    /// was detected on, and returns what was stored.
    pub fn apply_detected_crop(&mut self, area: CropArea, track_index: usize) -> CropBox {
        let detected = CropBox::from_area(area);
        let stored = match self.source.video_track(track_index) {
            Some(track) => detected.normalized(track.width, track.height),
            None => detected,
        };
        self.crop = stored;
        stored
    }

    // ---- Scale and anamorphic fix-up ----

    #[must_use]
    pub fn scale(&self) -> ScaleBox {
        self.scale
    }

    pub fn set_scale(&mut self, field: ScaleField, value: Option<u32>) {
        self.scale.set(field, value);
    }

    #[must_use]
    pub fn anamorphic(&self) -> AnamorphicState {
        self.selected_track()
            .map(|track| AnamorphicState::compute(track, &self.scale))
            .unwrap_or_default()
    }

    /// The stored choice, whether or not it currently applies.
    #[must_use]
    pub fn fix_sar_requested(&self) -> bool {
        self.fix_sar
    }

    pub fn set_fix_sar(&mut self, value: bool) {
        self.fix_sar = value;
    }

    /// The choice downstream consumers should honor.
    #[must_use]
    pub fn effective_fix_sar(&self) -> bool {
        self.fix_sar && self.anamorphic().visible
    }

    // ---- Deinterlace ----

    #[must_use]
    pub fn deinterlace(&self) -> bool {
        self.deinterlace
    }

    pub fn set_deinterlace(&mut self, value: bool) {
        self.deinterlace = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SampleAspectRatio;

    fn hd_store() -> ParameterStore {
        let source = Source::new("movie.mkv", vec![VideoTrack::new(1920, 1080)], vec![]);
        ParameterStore::new(Arc::new(source))
    }

    fn anamorphic_store() -> ParameterStore {
        let source = Source::new(
            "dvd.mkv",
            vec![
                VideoTrack::new(720, 480).with_sample_aspect_ratio(SampleAspectRatio::new(32, 27)),
                VideoTrack::new(1280, 720),
            ],
            vec![],
        );
        ParameterStore::new(Arc::new(source))
    }

    #[test]
    fn test_normalized_full_frame_is_unset_and_idempotent() {
        let full = CropBox::from_area(CropArea::new(1920, 1080, 0, 0));
        let once = full.normalized(1920, 1080);
        assert!(once.is_unset());
        assert_eq!(once.normalized(1920, 1080), once);
    }

    #[test]
    fn test_normalized_keeps_partial_crop() {
        let partial = CropBox::from_area(CropArea::new(1900, 1080, 10, 0));
        assert_eq!(partial.normalized(1920, 1080), partial);
        // Full frame at an offset still counts as covering the frame.
        let offset = CropBox::from_area(CropArea::new(1920, 1080, 4, 0));
        assert!(offset.normalized(1920, 1080).is_unset());
    }

    #[test]
    fn test_apply_detected_crop() {
        let mut store = hd_store();
        let stored = store.apply_detected_crop(CropArea::new(1920, 1080, 0, 0), 0);
        assert!(stored.is_unset());
        assert!(store.crop().is_unset());

        let stored = store.apply_detected_crop(CropArea::new(1900, 1080, 10, 0), 0);
        assert_eq!(
            stored,
            CropBox {
                width: Some(1900),
                height: Some(1080),
                left: Some(10),
                top: Some(0),
            }
        );
        assert_eq!(store.crop(), stored);
    }

    #[test]
    fn test_manual_full_frame_crop_is_preserved() {
        let mut store = hd_store();
        store.set_crop(CropField::Width, Some(1920));
        store.set_crop(CropField::Height, Some(1080));
        store.set_crop(CropField::Left, Some(0));
        store.set_crop(CropField::Top, Some(0));
        assert_eq!(store.crop(), CropBox::from_area(CropArea::new(1920, 1080, 0, 0)));
    }

    #[test]
    fn test_set_crop_field_and_clear() {
        let mut store = hd_store();
        store.set_crop(CropField::Height, Some(800));
        store.set_crop(CropField::Top, Some(140));
        assert_eq!(store.crop().get(CropField::Height), Some(800));
        assert_eq!(store.crop().get(CropField::Width), None);

        store.set_crop(CropField::Top, None);
        assert_eq!(store.crop().top, None);

        store.clear_crop();
        assert!(store.crop().is_unset());
    }

    #[test]
    fn test_square_source_never_anamorphic() {
        let mut store = hd_store();
        store.set_scale(ScaleField::Width, Some(1280));
        assert!(!store.anamorphic().visible);
        store.set_fix_sar(true);
        assert!(store.fix_sar_requested());
        assert!(!store.effective_fix_sar());
    }

    #[test]
    fn test_anamorphic_needs_scale() {
        let mut store = anamorphic_store();
        assert!(!store.anamorphic().visible);

        store.set_scale(ScaleField::Height, Some(480));
        assert!(store.anamorphic().visible);

        store.set_fix_sar(true);
        assert!(store.effective_fix_sar());

        // Clearing the scale hides the option without forgetting the choice.
        store.set_scale(ScaleField::Height, None);
        assert!(!store.anamorphic().visible);
        assert!(!store.effective_fix_sar());
        assert!(store.fix_sar_requested());
    }

    #[test]
    fn test_zero_scale_is_unset() {
        let mut store = anamorphic_store();
        store.set_scale(ScaleField::Width, Some(0));
        assert_eq!(store.scale().width, None);
        assert!(!store.scale().is_set());
        assert!(!store.anamorphic().visible);

        store.set_scale(ScaleField::Width, Some(640));
        store.set_scale(ScaleField::Width, Some(0));
        assert!(!store.anamorphic().visible);
    }

    #[test]
    fn test_anamorphic_follows_selected_track() {
        let mut store = anamorphic_store();
        store.set_scale(ScaleField::Width, Some(640));
        assert!(store.anamorphic().visible);

        store.select_video_track(1).unwrap();
        assert!(!store.anamorphic().visible);
    }

    #[test]
    fn test_select_video_track_out_of_range() {
        let mut store = hd_store();
        let err = store.select_video_track(1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidIndex {
                kind: TrackKind::Video,
                index: 1,
                available: 1
            }
        ));
        assert_eq!(store.video_track(), 0);
    }

    #[test]
    fn test_detected_crop_uses_probed_track_frame() {
        let mut store = anamorphic_store();
        // Track 1 is 1280x720; a 1280x720 result on it is a no-op crop even
        // though track 0 is selected.
        let stored = store.apply_detected_crop(CropArea::new(1280, 720, 0, 0), 1);
        assert!(stored.is_unset());
    }

    #[test]
    fn test_deinterlace_setter() {
        let mut store = hd_store();
        assert!(!store.deinterlace());
        store.set_deinterlace(true);
        assert!(store.deinterlace());
    }
}
