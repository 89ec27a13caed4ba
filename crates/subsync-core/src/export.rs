use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{
    stage::Timeline,
    time::{format_srt_timestamp, seconds_to_millis},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SrtOptions {
    /// Prefix each cue with `speaker: `.
    pub include_speaker: bool,
}

#[must_use]
pub fn timeline_to_srt(timeline: &Timeline, options: SrtOptions) -> String {
    let mut out = String::new();

    for (index, cue) in timeline.subtitles.iter().enumerate() {
        let start = seconds_to_millis(cue.start);
        let end = seconds_to_millis(cue.end.unwrap_or(timeline.duration)).max(start);

        out.push_str(&(index + 1).to_string());
        out.push('\n');
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(start),
            format_srt_timestamp(end)
        ));

        if options.include_speaker {
            out.push_str(&cue.speaker);
            out.push_str(": ");
        }
        for line in cue.text.lines() {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

#[instrument(skip(timeline), fields(path = %path.display(), cues = timeline.subtitles.len()))]
pub fn write_srt(path: &Path, timeline: &Timeline, options: SrtOptions) -> Result<()> {
    write_atomic(path, timeline_to_srt(timeline, options).as_bytes())?;
    info!("srt written");
    Ok(())
}

#[instrument(skip(timeline), fields(path = %path.display(), cues = timeline.subtitles.len()))]
pub fn write_timeline_json(path: &Path, timeline: &Timeline) -> Result<()> {
    let json = serde_json::to_vec_pretty(timeline).context("failed to encode timeline json")?;
    write_atomic(path, &json)?;
    info!("timeline json written");
    Ok(())
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("failed to create directory: {}", parent.display()))?;

    let mut temp_file =
        tempfile::NamedTempFile::new_in(&parent).context("failed to create temp export file")?;
    temp_file
        .write_all(bytes)
        .context("failed to write temp export file")?;
    temp_file
        .persist(path)
        .map_err(|error| anyhow::anyhow!(error.error))
        .with_context(|| format!("failed to persist export: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::stage::{PanelId, SubtitleCue};

    use super::*;

    #[test]
    fn srt_keeps_wrapped_lines_and_closes_open_cues() {
        let timeline = Timeline {
            duration: 5.5,
            subtitles: vec![
                SubtitleCue {
                    id: PanelId(0),
                    speaker: "めたん".to_string(),
                    speaker_color: "#d6336c".to_string(),
                    text: "食べ物じゃないですわ！\nでも大事ですわ。".to_string(),
                    start: 0.0,
                    end: Some(3.4),
                },
                SubtitleCue {
                    id: PanelId(1),
                    speaker: "ずんだもん".to_string(),
                    speaker_color: "#099268".to_string(),
                    text: "なのだ".to_string(),
                    start: 3.4,
                    end: None,
                },
            ],
            audio: Vec::new(),
        };

        let srt = timeline_to_srt(&timeline, SrtOptions::default());
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:03,400\n食べ物じゃないですわ！\nでも大事ですわ。\n\n\
             2\n00:00:03,400 --> 00:00:05,500\nなのだ\n\n"
        );

        let with_speaker = timeline_to_srt(
            &timeline,
            SrtOptions {
                include_speaker: true,
            },
        );
        assert!(with_speaker.contains("ずんだもん: なのだ\n"));
    }
}
