use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    manifest::AudioManifest,
    matcher::FuzzyMatcher,
    model::{DEFAULT_NARRATION_SECONDS, MatchResult, NarrationEvent, SceneCursor, scene_group_key},
    script::SceneMap,
    stage::{PanelId, Stage, SubtitlePanel, TimelineStage},
    wrap::{DEFAULT_BREAK_SEARCH_RADIUS, DEFAULT_SUBTITLE_MAX_CHARS, wrap_subtitle},
};

pub const DEFAULT_FADE_IN_SECONDS: f64 = 0.3;
pub const DEFAULT_SETTLE_SECONDS: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub matcher: FuzzyMatcher,
    pub default_duration: f64,
    /// Run time of the subtitle fade-in.
    pub fade_in_seconds: f64,
    /// Extra hold after the resolved duration.
    pub settle_seconds: f64,
    pub max_chars: usize,
    pub search_radius: usize,
    /// Base for relative clip paths in the manifest.
    pub audio_root: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            matcher: FuzzyMatcher::default(),
            default_duration: DEFAULT_NARRATION_SECONDS,
            fade_in_seconds: DEFAULT_FADE_IN_SECONDS,
            settle_seconds: DEFAULT_SETTLE_SECONDS,
            max_chars: DEFAULT_SUBTITLE_MAX_CHARS,
            search_radius: DEFAULT_BREAK_SEARCH_RADIUS,
            audio_root: PathBuf::from("."),
        }
    }
}

/// Shared, read-only entry point; hands out one `SceneRun` per scene execution.
#[derive(Debug, Clone, Copy)]
pub struct Synchronizer<'a> {
    manifest: &'a AudioManifest,
    settings: &'a SyncSettings,
}

impl<'a> Synchronizer<'a> {
    #[must_use]
    pub fn new(manifest: &'a AudioManifest, settings: &'a SyncSettings) -> Self {
        Self { manifest, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        self.settings
    }

    /// Starts a scene with a fresh cursor at the beginning of its group.
    #[must_use]
    pub fn begin_scene(&self, scene_name: &str) -> SceneRun<'a> {
        let group = scene_group_key(scene_name).to_string();
        info!(
            scene = scene_name,
            %group,
            clips = self.manifest.clips(&group).len(),
            "scene narration started"
        );
        SceneRun {
            manifest: self.manifest,
            settings: self.settings,
            group,
            cursor: SceneCursor::new(),
        }
    }
}

/// Narration state of one scene execution.
#[derive(Debug)]
pub struct SceneRun<'a> {
    manifest: &'a AudioManifest,
    settings: &'a SyncSettings,
    group: String,
    cursor: SceneCursor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    pub panel: PanelId,
    pub result: MatchResult,
}

impl SceneRun<'_> {
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn cursor(&self) -> SceneCursor {
        self.cursor
    }

    /// Resolves the clip and hold time for one line, consuming the matched clip.
    #[instrument(skip(self, event), fields(group = %self.group, cursor = self.cursor.speech_index()))]
    pub fn resolve(&mut self, event: &NarrationEvent) -> MatchResult {
        let clips = self.manifest.clips(&self.group);
        let Some(found) = self
            .settings
            .matcher
            .match_and_advance(&event.text, clips, &mut self.cursor)
        else {
            return MatchResult::unmatched(event.requested_duration);
        };

        let audio_path = self.settings.audio_root.join(&found.record.file);
        if !audio_path.is_file() {
            trace!(path = %audio_path.display(), "matched clip not rendered, using requested duration");
            return MatchResult {
                clip: None,
                index: Some(found.index),
                ratio: found.ratio,
                effective_duration: event.requested_duration,
            };
        }

        let mut record = found.record;
        record.file = audio_path;
        MatchResult {
            effective_duration: record.duration,
            clip: Some(record),
            index: Some(found.index),
            ratio: found.ratio,
        }
    }

    /// Shows one narration line on `stage`, playing its clip when one is available.
    ///
    /// Audio starts together with the subtitle fade-in; the stage then holds for the
    /// resolved duration plus the settle time.
    pub fn narrate<S: Stage + ?Sized>(
        &mut self,
        stage: &mut S,
        event: &NarrationEvent,
        previous: Option<PanelId>,
    ) -> Narration {
        let result = self.resolve(event);
        if let Some(clip) = &result.clip {
            stage.play_audio(&clip.file);
        }

        let panel = SubtitlePanel {
            speaker: event.speaker.clone(),
            speaker_color: event.speaker_color.clone(),
            text: wrap_subtitle(
                &event.text,
                self.settings.max_chars,
                self.settings.search_radius,
            ),
        };
        let id = stage.show_subtitle(&panel, previous, self.settings.fade_in_seconds);
        stage.advance(result.effective_duration + self.settings.settle_seconds);

        debug!(
            panel = id.0,
            audio = result.has_audio(),
            seconds = result.effective_duration,
            "narration line shown"
        );
        Narration { panel: id, result }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneReport {
    pub scene: String,
    pub group: String,
    pub lines: usize,
    pub matched: usize,
    pub with_audio: usize,
    pub clips: usize,
    pub cursor: usize,
}

/// Plays every scene of `scene_map` onto a recording stage, one scene run each.
///
/// Each line replaces the previous panel of its scene and the last panel is
/// hidden when the scene ends.
#[instrument(skip_all, fields(scenes = scene_map.scenes.len()))]
pub fn rehearse(
    synchronizer: &Synchronizer<'_>,
    scene_map: &SceneMap,
    stage: &mut TimelineStage,
) -> Vec<SceneReport> {
    let default_duration = synchronizer.settings().default_duration;
    let mut reports = Vec::with_capacity(scene_map.scenes.len());

    for scene in &scene_map.scenes {
        let scene_name = scene.scene_name();
        let mut run = synchronizer.begin_scene(&scene_name);
        let mut previous = None;
        let mut matched = 0;
        let mut with_audio = 0;

        for line in &scene.lines {
            let narration = run.narrate(stage, &line.to_event(default_duration), previous);
            matched += usize::from(narration.result.index.is_some());
            with_audio += usize::from(narration.result.has_audio());
            previous = Some(narration.panel);
        }
        if let Some(panel) = previous {
            stage.hide_subtitle(panel);
        }

        let clips = synchronizer.manifest.clips(run.group()).len();
        if matched < scene.lines.len() && clips > 0 {
            warn!(
                scene = %scene_name,
                unmatched = scene.lines.len() - matched,
                "some lines have no matching clip"
            );
        }
        reports.push(SceneReport {
            scene: scene_name,
            group: run.group().to_string(),
            lines: scene.lines.len(),
            matched,
            with_audio,
            clips,
            cursor: run.cursor().speech_index(),
        });
    }

    reports
}
