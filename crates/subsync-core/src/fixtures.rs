use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    manifest::AudioManifest,
    model::AudioClipRecord,
    script::{SceneMap, SceneScript, ScriptLine},
};

pub const ZUNDA_COLOR: &str = "#099268";
pub const METAN_COLOR: &str = "#d6336c";

fn record(text: &str, file: &str, duration: f64) -> AudioClipRecord {
    AudioClipRecord {
        text: text.to_string(),
        file: PathBuf::from(file),
        duration,
    }
}

fn line(speaker: &str, color: &str, text: &str) -> ScriptLine {
    ScriptLine {
        speaker: speaker.to_string(),
        text: text.to_string(),
        color: Some(color.to_string()),
        duration: None,
    }
}

/// Two-clip `Scene03` track used by docs and tests.
#[must_use]
pub fn vending_manifest() -> AudioManifest {
    let mut groups = BTreeMap::new();
    groups.insert(
        "Scene03".to_string(),
        vec![
            record("自販機はよく使うのだ", "audio/scene_03_00.wav", 2.0),
            record(
                "自販機ではお金を入れてボタンを押すだけでジュースが出ます",
                "audio/scene_03_01.wav",
                3.5,
            ),
        ],
    );
    AudioManifest::from_records(groups)
}

#[must_use]
pub fn demo_scene_map() -> SceneMap {
    SceneMap {
        speakers: BTreeMap::from([("ずんだもん".to_string(), 3), ("めたん".to_string(), 2)]),
        scenes: vec![
            SceneScript {
                id: 1,
                title: Some("Intro".to_string()),
                name: Some("Scene01_Intro".to_string()),
                lines: vec![
                    line(
                        "ずんだもん",
                        ZUNDA_COLOR,
                        "ねぇめたん、「API」ってよく聞くけど、美味しいの？",
                    ),
                    line(
                        "めたん",
                        METAN_COLOR,
                        "食べ物じゃないですわ！ でも、知らないとエンジニアとしては致命的ですわよ。",
                    ),
                    line("ずんだもん", ZUNDA_COLOR, "え、そんなに大事なのだ？"),
                ],
            },
            SceneScript {
                id: 3,
                title: Some("Vending machine".to_string()),
                name: Some("Scene03_Vending".to_string()),
                lines: vec![
                    line("ずんだもん", ZUNDA_COLOR, "自販機はよく使うのだ"),
                    line(
                        "めたん",
                        METAN_COLOR,
                        "自販機ではお金を入れてボタンを押すだけでジュースが出ますよね",
                    ),
                ],
            },
        ],
    }
}
