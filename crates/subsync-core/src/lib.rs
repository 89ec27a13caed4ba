pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod export;
pub mod fixtures;
pub mod lint;
pub mod manifest;
pub mod matcher;
pub mod model;
pub mod script;
pub mod similarity;
pub mod stage;
pub mod sync;
pub mod time;
pub mod wrap;

pub use assets::{AudioAssetEntry, ClipDuration, probe_duration, scan_audio_clips};
pub use config::AppConfig;
pub use diagnostics::{TelemetryGuard, init_tracing_with_config};
pub use export::{SrtOptions, timeline_to_srt, write_srt, write_timeline_json};
pub use lint::{LintReport, LintRules, lint_script, lint_script_file};
pub use manifest::{AudioManifest, ManifestError, build_manifest};
pub use matcher::{ClipMatch, DEFAULT_MATCH_THRESHOLD, DEFAULT_MATCH_WINDOW, FuzzyMatcher};
pub use model::{
    AudioClipRecord, DEFAULT_NARRATION_SECONDS, MatchResult, NarrationEvent, RecordError,
    SceneCursor, scene_group_key, scene_group_of,
};
pub use script::{SceneMap, SceneScript, ScriptLine, load_scene_map};
pub use stage::{PanelId, Stage, SubtitlePanel, Timeline, TimelineStage};
pub use sync::{Narration, SceneRun, SyncSettings, Synchronizer};
pub use wrap::wrap_subtitle;
