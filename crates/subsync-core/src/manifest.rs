use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{assets, export, model::AudioClipRecord, script::SceneMap};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read audio manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid audio manifest json {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("audio manifest {path} has unexpected shape: {detail}")]
    Shape { path: PathBuf, detail: String },
}

/// Scene group name -> clips in narration order.
///
/// Records stay in their raw JSON form and are validated when a scene asks for
/// them, so one bad entry only affects the narration lines that reach it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AudioManifest {
    groups: BTreeMap<String, Vec<Value>>,
}

impl AudioManifest {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(groups: BTreeMap<String, Vec<AudioClipRecord>>) -> Self {
        let groups = groups
            .into_iter()
            .map(|(group, records)| {
                let values = records
                    .iter()
                    .map(|record| {
                        serde_json::json!({
                            "text": record.text,
                            "file": record.file.display().to_string(),
                            "duration": record.duration,
                        })
                    })
                    .collect();
                (group, values)
            })
            .collect();
        Self { groups }
    }

    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let bytes = fs::read(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let manifest = Self::from_value(value).map_err(|detail| ManifestError::Shape {
            path: path.to_path_buf(),
            detail,
        })?;

        info!(
            groups = manifest.groups.len(),
            clips = manifest.clip_count(),
            "audio manifest loaded"
        );
        Ok(manifest)
    }

    /// Loads the manifest once at startup; any failure yields an empty manifest so
    /// narration falls back to fixed subtitle durations.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(ManifestError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no audio manifest, subtitles use fixed durations");
                Self::empty()
            }
            Err(error) => {
                warn!(%error, "failed to load audio manifest, continuing without audio");
                Self::empty()
            }
        }
    }

    fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(entries) = value else {
            return Err("top level must be an object of scene groups".to_string());
        };

        let mut groups = BTreeMap::new();
        for (group, clips) in entries {
            let Value::Array(clips) = clips else {
                return Err(format!("group `{group}` must be a list of clips"));
            };
            groups.insert(group, clips);
        }
        Ok(Self { groups })
    }

    /// Clips for a scene group; unknown groups have none.
    #[must_use]
    pub fn clips(&self, group: &str) -> &[Value] {
        self.groups.get(group).map_or(&[][..], Vec::as_slice)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[instrument(skip(self), fields(path = %path.display(), groups = self.groups.len()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("failed to serialize audio manifest")?;
        export::write_atomic(path, &json)?;
        info!("audio manifest saved");
        Ok(())
    }
}

/// Summary row used by `inspect`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    pub clip_count: usize,
    pub invalid_records: usize,
    pub total_duration: f64,
}

#[must_use]
pub fn summarize(manifest: &AudioManifest) -> Vec<GroupSummary> {
    manifest
        .groups
        .iter()
        .map(|(group, clips)| {
            let records: Vec<_> = clips.iter().map(AudioClipRecord::try_from).collect();
            GroupSummary {
                group: group.clone(),
                clip_count: clips.len(),
                invalid_records: records.iter().filter(|record| record.is_err()).count(),
                total_duration: records
                    .iter()
                    .filter_map(|record| record.as_ref().ok())
                    .map(|record| record.duration)
                    .sum(),
            }
        })
        .collect()
}

/// Audio file stem for one scripted line, e.g. `scene_03_01`.
#[must_use]
pub fn clip_file_stem(scene_id: u32, line_index: usize) -> String {
    format!("scene_{scene_id:02}_{line_index:02}")
}

/// Builds a manifest from a scene map and a directory of already rendered clips.
///
/// Lines without a decodable clip on disk are left out so a partially rendered
/// directory still produces a usable manifest. Durations come from decoding each clip.
#[instrument(skip(scene_map), fields(scenes = scene_map.scenes.len(), audio_dir = %audio_dir.display()))]
pub fn build_manifest(scene_map: &SceneMap, audio_dir: &Path) -> Result<AudioManifest> {
    let assets = assets::scan_audio_clips(audio_dir)?;
    let by_stem: HashMap<String, PathBuf> = assets
        .into_iter()
        .filter_map(|asset| {
            let stem = asset.path.file_stem()?.to_str()?.to_string();
            Some((stem, asset.path))
        })
        .collect();

    let mut groups: BTreeMap<String, Vec<AudioClipRecord>> = BTreeMap::new();
    for scene in &scene_map.scenes {
        let group = scene.group_key();
        let records = groups.entry(group.clone()).or_default();

        for (line_index, line) in scene.lines.iter().enumerate() {
            let stem = clip_file_stem(scene.id, line_index);
            let Some(path) = by_stem.get(&stem) else {
                warn!(%group, %stem, "clip not rendered yet, leaving line out of manifest");
                continue;
            };

            if path.to_str().is_none() {
                warn!(%group, %stem, path = %path.display(), "clip path is not valid UTF-8, leaving line out of manifest");
                continue;
            }
            let duration = match assets::probe_duration(path) {
                Ok(duration) => duration,
                Err(error) => {
                    warn!(%group, %stem, error = %format!("{error:#}"), "clip could not be decoded, leaving line out of manifest");
                    continue;
                }
            };
            debug!(%group, %stem, seconds = duration.seconds, "clip added");
            records.push(AudioClipRecord {
                text: line.text.clone(),
                file: path.clone(),
                duration: duration.seconds,
            });
        }
    }

    let manifest = AudioManifest::from_records(groups);
    info!(
        groups = manifest.len(),
        clips = manifest.clip_count(),
        "audio manifest built"
    );
    Ok(manifest)
}
