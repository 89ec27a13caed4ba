use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Handle to a subtitle panel shown on a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(pub u64);

/// Speaker name plus the (already wrapped) dialogue, as laid out on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitlePanel {
    pub speaker: String,
    pub speaker_color: String,
    pub text: String,
}

/// What the synchronizer needs from an animation engine.
pub trait Stage {
    /// Fades `panel` in over `fade_seconds`, fading out `replacing` at the same time.
    fn show_subtitle(
        &mut self,
        panel: &SubtitlePanel,
        replacing: Option<PanelId>,
        fade_seconds: f64,
    ) -> PanelId;

    /// Starts playback at the current timeline position.
    fn play_audio(&mut self, path: &Path);

    /// Holds the current frame for `seconds`.
    fn advance(&mut self, seconds: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub id: PanelId,
    pub speaker: String,
    pub speaker_color: String,
    pub text: String,
    pub start: f64,
    pub end: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    pub path: PathBuf,
    pub start: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub duration: f64,
    pub subtitles: Vec<SubtitleCue>,
    pub audio: Vec<AudioCue>,
}

/// Stage that only records what would be drawn and played, on a virtual clock.
#[derive(Debug, Clone, Default)]
pub struct TimelineStage {
    clock: f64,
    next_id: u64,
    timeline: Timeline,
}

impl TimelineStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Fades out a panel without replacing it.
    pub fn hide_subtitle(&mut self, id: PanelId) {
        let clock = self.clock;
        if let Some(cue) = self
            .timeline
            .subtitles
            .iter_mut()
            .find(|cue| cue.id == id && cue.end.is_none())
        {
            cue.end = Some(clock);
        }
    }

    /// Closes every open cue at the current clock and returns the recording.
    #[must_use]
    pub fn finish(mut self) -> Timeline {
        let clock = self.clock;
        for cue in &mut self.timeline.subtitles {
            cue.end.get_or_insert(clock);
        }
        self.timeline.duration = clock;
        self.timeline
    }
}

impl Stage for TimelineStage {
    fn show_subtitle(
        &mut self,
        panel: &SubtitlePanel,
        replacing: Option<PanelId>,
        fade_seconds: f64,
    ) -> PanelId {
        if let Some(previous) = replacing {
            self.hide_subtitle(previous);
        }

        let id = PanelId(self.next_id);
        self.next_id += 1;
        self.timeline.subtitles.push(SubtitleCue {
            id,
            speaker: panel.speaker.clone(),
            speaker_color: panel.speaker_color.clone(),
            text: panel.text.clone(),
            start: self.clock,
            end: None,
        });
        trace!(id = id.0, start = self.clock, "subtitle shown");
        self.advance(fade_seconds);
        id
    }

    fn play_audio(&mut self, path: &Path) {
        trace!(path = %path.display(), start = self.clock, "audio started");
        self.timeline.audio.push(AudioCue {
            path: path.to_path_buf(),
            start: self.clock,
        });
    }

    fn advance(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.clock += seconds;
        }
    }
}
