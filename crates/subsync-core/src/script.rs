use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::model::{DEFAULT_SPEAKER_COLOR, NarrationEvent, scene_group_key};

/// Scene map: the scripted lines for every scene of one video.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SceneMap {
    /// Speaker name -> voice id used when the clips were rendered.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub speakers: BTreeMap<String, u32>,
    pub scenes: Vec<SceneScript>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneScript {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Scene type name, e.g. `Scene03_Vending`. Defaults to `Scene{id:02}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub lines: Vec<ScriptLine>,
}

impl SceneScript {
    #[must_use]
    pub fn scene_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Scene{:02}", self.id))
    }

    #[must_use]
    pub fn group_key(&self) -> String {
        scene_group_key(&self.scene_name()).to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptLine {
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl ScriptLine {
    #[must_use]
    pub fn to_event(&self, default_duration: f64) -> NarrationEvent {
        NarrationEvent::new(&self.speaker, &self.text)
            .with_color(self.color.as_deref().unwrap_or(DEFAULT_SPEAKER_COLOR))
            .with_duration(self.duration.unwrap_or(default_duration))
    }
}

#[instrument(fields(path = %path.display()))]
pub fn load_scene_map(path: &Path) -> Result<SceneMap> {
    let content =
        fs::read(path).with_context(|| format!("failed to read scene map: {}", path.display()))?;
    let scene_map: SceneMap = serde_json::from_slice(&content)
        .with_context(|| format!("invalid scene map json: {}", path.display()))?;
    info!(scenes = scene_map.scenes.len(), "scene map loaded");
    Ok(scene_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_name_defaults_from_id() {
        let scene: SceneScript = serde_json::from_str(r#"{"id": 3, "lines": []}"#)
            .expect("scene should parse");
        assert_eq!(scene.scene_name(), "Scene03");
        assert_eq!(scene.group_key(), "Scene03");

        let named: SceneScript =
            serde_json::from_str(r#"{"id": 3, "name": "Scene03_Vending"}"#)
                .expect("scene should parse");
        assert_eq!(named.group_key(), "Scene03");
    }

    #[test]
    fn line_fills_event_defaults() {
        let line: ScriptLine =
            serde_json::from_str(r#"{"speaker": "めたん", "text": "こんにちは"}"#)
                .expect("line should parse");
        let event = line.to_event(2.5);
        assert_eq!(event.requested_duration, 2.5);
        assert_eq!(event.speaker_color, DEFAULT_SPEAKER_COLOR);
    }
}
