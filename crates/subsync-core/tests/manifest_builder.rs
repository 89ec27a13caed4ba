use std::path::Path;

use subsync_core::{
    AudioClipRecord, build_manifest, fixtures::demo_scene_map, probe_duration, scan_audio_clips,
};
use tempfile::tempdir;

fn write_test_wav(path: &Path, seconds: f32) {
    let sample_rate = 24_000_u32;
    let frame_count = (seconds * sample_rate as f32).round() as usize;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).expect("test wav should be creatable");
    for frame in 0..frame_count {
        let phase = frame as f32 / sample_rate as f32 * 220.0 * std::f32::consts::TAU;
        let sample = (phase.sin() * 0.4 * f32::from(i16::MAX)).round() as i16;
        writer
            .write_sample(sample)
            .expect("test wav sample write should succeed");
    }
    writer.finalize().expect("test wav finalize should succeed");
}

#[test]
fn probe_reports_clip_length() {
    let temp = tempdir().expect("tempdir should be creatable");
    let path = temp.path().join("line.wav");
    write_test_wav(&path, 1.5);

    let duration = probe_duration(&path).expect("probe should succeed");
    assert_eq!(duration.sample_rate, 24_000);
    assert_eq!(duration.total_frames, 36_000);
    assert!((duration.seconds - 1.5).abs() < 1e-6);
}

#[test]
fn scan_ignores_non_audio_files() {
    let temp = tempdir().expect("tempdir should be creatable");
    write_test_wav(&temp.path().join("scene_01_00.wav"), 0.2);
    std::fs::write(temp.path().join("notes.txt"), "not audio").expect("notes should be writable");

    let clips = scan_audio_clips(temp.path()).expect("scan should succeed");
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].extension, "wav");
    assert_eq!(clips[0].path, temp.path().join("scene_01_00.wav"));
    assert!(scan_audio_clips(&temp.path().join("missing")).is_err());
}

#[test]
fn partially_rendered_scenes_keep_available_clips() {
    let temp = tempdir().expect("tempdir should be creatable");
    let audio_dir = temp.path().join("audio");
    std::fs::create_dir_all(&audio_dir).expect("audio dir should be creatable");

    // Scene01 line 1 has not been rendered yet.
    write_test_wav(&audio_dir.join("scene_01_00.wav"), 1.0);
    write_test_wav(&audio_dir.join("scene_01_02.wav"), 0.5);
    write_test_wav(&audio_dir.join("scene_03_00.wav"), 2.0);
    write_test_wav(&audio_dir.join("scene_03_01.wav"), 3.5);

    let scene_map = demo_scene_map();
    let manifest = build_manifest(&scene_map, &audio_dir).expect("manifest should build");
    assert_eq!(manifest.group_names().collect::<Vec<_>>(), vec!["Scene01", "Scene03"]);

    let intro: Vec<AudioClipRecord> = manifest
        .clips("Scene01")
        .iter()
        .map(|value| AudioClipRecord::try_from(value).expect("built record is valid"))
        .collect();
    assert_eq!(intro.len(), 2);
    assert_eq!(intro[0].text, scene_map.scenes[0].lines[0].text);
    assert_eq!(intro[1].text, scene_map.scenes[0].lines[2].text);
    assert!(intro[1].file.ends_with("scene_01_02.wav"));
    assert!((intro[1].duration - 0.5).abs() < 1e-6);

    let vending = manifest.clips("Scene03");
    assert_eq!(vending.len(), 2);
    let second = AudioClipRecord::try_from(&vending[1]).expect("built record is valid");
    assert!((second.duration - 3.5).abs() < 1e-6);
}

#[test]
fn undecodable_clip_is_left_out() {
    let temp = tempdir().expect("tempdir should be creatable");
    let audio_dir = temp.path().join("audio");
    std::fs::create_dir_all(&audio_dir).expect("audio dir should be creatable");

    // Zero bytes, as left behind by an interrupted render.
    std::fs::write(audio_dir.join("scene_03_00.wav"), b"").expect("empty clip should be writable");
    write_test_wav(&audio_dir.join("scene_03_01.wav"), 1.0);

    let scene_map = demo_scene_map();
    let manifest = build_manifest(&scene_map, &audio_dir).expect("manifest should build");

    let vending = manifest.clips("Scene03");
    assert_eq!(vending.len(), 1);
    let only = AudioClipRecord::try_from(&vending[0]).expect("built record is valid");
    assert_eq!(only.text, scene_map.scenes[1].lines[1].text);
    assert!(only.file.ends_with("scene_03_01.wav"));
    assert!((only.duration - 1.0).abs() < 1e-6);
}

#[cfg(unix)]
#[test]
fn non_utf8_clip_paths_are_left_out() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let temp = tempdir().expect("tempdir should be creatable");
    let audio_dir = temp.path().join(OsStr::from_bytes(b"audio-\xff"));
    std::fs::create_dir_all(&audio_dir).expect("audio dir should be creatable");
    write_test_wav(&audio_dir.join("scene_03_00.wav"), 1.0);

    let manifest = build_manifest(&demo_scene_map(), &audio_dir).expect("manifest should build");
    assert!(manifest.clips("Scene03").is_empty());
    assert_eq!(manifest.clip_count(), 0);
}
