use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    model::{AudioClipRecord, RecordError, SceneCursor},
    similarity,
};

/// Clips looked at past the cursor for each narration line.
// TODO: tune window and threshold against a few full recorded tracks; both came from one series.
pub const DEFAULT_MATCH_WINDOW: usize = 5;
/// Similarity a clip must strictly exceed to be accepted.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct ClipMatch {
    /// Position within the whole scene group, not within the window.
    pub index: usize,
    pub ratio: f64,
    pub record: AudioClipRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatcher {
    pub window: usize,
    pub threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            window: DEFAULT_MATCH_WINDOW,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl FuzzyMatcher {
    #[must_use]
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }

    /// Highest scoring clip in `[cursor, cursor + window)`, earliest first on ties.
    ///
    /// Fails if any record in the window is malformed.
    pub fn best_candidate(
        &self,
        text: &str,
        clips: &[Value],
        cursor: usize,
    ) -> Result<Option<ClipMatch>, RecordError> {
        let start = cursor.min(clips.len());
        let end = clips.len().min(start.saturating_add(self.window));

        let mut best: Option<ClipMatch> = None;
        for (offset, value) in clips[start..end].iter().enumerate() {
            let record = AudioClipRecord::try_from(value)?;
            let ratio = similarity::ratio(text, &record.text);
            if best.as_ref().is_none_or(|current| ratio > current.ratio) {
                best = Some(ClipMatch {
                    index: start + offset,
                    ratio,
                    record,
                });
            }
        }
        Ok(best)
    }

    #[must_use]
    pub fn accepts(&self, ratio: f64) -> bool {
        ratio > self.threshold
    }

    /// Matches `text` against the clips after `cursor` and consumes the accepted clip.
    ///
    /// Rejections and malformed records leave the cursor where it was.
    #[instrument(skip(self, text, clips, cursor), fields(cursor = cursor.speech_index(), clips = clips.len()))]
    pub fn match_and_advance(
        &self,
        text: &str,
        clips: &[Value],
        cursor: &mut SceneCursor,
    ) -> Option<ClipMatch> {
        let candidate = match self.best_candidate(text, clips, cursor.speech_index()) {
            Ok(candidate) => candidate?,
            Err(error) => {
                warn!(%error, "skipping audio match for narration line");
                return None;
            }
        };

        if !self.accepts(candidate.ratio) {
            debug!(
                best_index = candidate.index,
                ratio = candidate.ratio,
                "no clip above threshold"
            );
            return None;
        }

        cursor.consume(candidate.index, clips.len());
        debug!(
            index = candidate.index,
            ratio = candidate.ratio,
            next = cursor.speech_index(),
            "clip matched"
        );
        Some(candidate)
    }
}
